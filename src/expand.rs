/// Marker that expands to the shell's own process id.
const PID_MARKER: &str = "$$";

/// Replaces every occurrence of `$$` in the input with the decimal form of
/// `pid`. Occurrences are scanned left to right and scanning resumes after
/// the consumed marker, so the inserted digits can never combine with
/// surrounding text into a new marker.
pub fn expand_pid(input: &str, pid: u32) -> String {
    if !input.contains(PID_MARKER) {
        return input.to_string();
    }

    let pid_text = pid.to_string();
    let mut result = String::with_capacity(input.len() + pid_text.len());
    let mut rest = input;

    while let Some(pos) = rest.find(PID_MARKER) {
        result.push_str(&rest[..pos]);
        result.push_str(&pid_text);
        rest = &rest[pos + PID_MARKER.len()..];
    }
    result.push_str(rest);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marker_returns_input() {
        assert_eq!(expand_pid("echo hello", 1234), "echo hello");
        assert_eq!(expand_pid("", 1234), "");
        assert_eq!(expand_pid("price is $5", 1234), "price is $5");
    }

    #[test]
    fn test_single_marker() {
        assert_eq!(expand_pid("echo $$", 1234), "echo 1234");
        assert_eq!(expand_pid("$$", 99), "99");
    }

    #[test]
    fn test_multiple_markers() {
        assert_eq!(expand_pid("$$ and $$", 7), "7 and 7");
        assert_eq!(expand_pid("a$$b$$c", 42), "a42b42c");
    }

    #[test]
    fn test_markers_do_not_overlap() {
        // Three dollars are one marker plus a literal dollar
        assert_eq!(expand_pid("$$$", 5), "5$");
        assert_eq!(expand_pid("$$$$", 5), "55");
        assert_eq!(expand_pid("$$$ x $$$", 12), "12$ x 12$");
    }

    #[test]
    fn test_input_of_only_markers() {
        assert_eq!(expand_pid("$$$$$$", 3), "333");
    }

    #[test]
    fn test_output_length_property() {
        let pid = 31337u32;
        let pid_len = pid.to_string().len();
        let cases = [("ls $$", 1), ("$$ $$ $$", 3), ("no marker", 0), ("$$$", 1)];

        for (input, count) in cases {
            let expanded = expand_pid(input, pid);
            assert_eq!(expanded.len(), input.len() + count * (pid_len - 2));
        }
    }
}
