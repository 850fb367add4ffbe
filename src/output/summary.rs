//! Terminal summary of the hottest stacks in a profile.

use crate::pprof::Profile;

/// One sample, resolved for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    /// Function names from root to leaf, `;`-separated
    pub stack: String,
    /// Innermost function
    pub leaf: String,
    pub count: i64,
    pub delay: i64,
}

/// Samples ordered by delay, highest first
///
/// Unresolvable references are shown as `?`.
pub fn hottest_stacks(profile: &Profile) -> Vec<StackSummary> {
    let mut stacks: Vec<StackSummary> = profile
        .sample
        .iter()
        .map(|sample| {
            let names: Vec<&str> = sample
                .location_id
                .iter()
                .map(|id| {
                    profile
                        .location(*id)
                        .and_then(|loc| loc.line.first())
                        .and_then(|line| profile.function(line.function_id))
                        .map(|func| func.name.as_str())
                        .unwrap_or("?")
                })
                .collect();

            StackSummary {
                stack: names.iter().rev().copied().collect::<Vec<_>>().join(";"),
                leaf: names.first().copied().unwrap_or("?").to_string(),
                count: sample.value.first().copied().unwrap_or(0),
                delay: sample.value.get(1).copied().unwrap_or(0),
            }
        })
        .collect();

    stacks.sort_by(|a, b| b.delay.cmp(&a.delay).then_with(|| a.stack.cmp(&b.stack)));
    stacks
}

/// Render the top `max_lines` stacks as a table
pub fn generate_text_summary(profile: &Profile, max_lines: usize) -> String {
    let stacks = hottest_stacks(profile);
    let total_delay = profile.total(1).max(1);

    let mut lines = Vec::new();

    lines.push("  HOTTEST STACKS (by delay)".to_string());
    lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━┳━━━━━━━━━━━━━━┳━━━━━━━━━┓".to_string());
    lines.push(format!(
        "  ┃ {:<42} ┃ {:^8} ┃ {:^12} ┃ {:^7} ┃",
        "Stack (leaf last)", "COUNT", "DELAY (ms)", "%"
    ));
    lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━━╋━━━━━━━━━━━━━━╋━━━━━━━━━┫".to_string());

    for stack in stacks.iter().take(max_lines) {
        let percentage = (stack.delay as f64 / total_delay as f64) * 100.0;
        let delay_ms = stack.delay as f64 / 1_000_000.0;

        lines.push(format!(
            "  ┃ {:<42} ┃ {:>8} ┃ {:>12.3} ┃ {:>6.1}% ┃",
            truncate_left(&stack.stack, 42),
            stack.count,
            delay_ms,
            percentage
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━━┻━━━━━━━━━━━━━━┻━━━━━━━━━┛".to_string());

    if stacks.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} unique stacks)",
            max_lines,
            stacks.len()
        ));
    }

    lines.join("\n")
}

/// Keep the last `width` characters, marking the cut with `...`
fn truncate_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        return s.to_string();
    }
    let keep = width.saturating_sub(3);
    let tail: String = s.chars().skip(len - keep).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pprof::ProfileBuilder;
    use crate::trace::Frame;

    fn profile() -> Profile {
        let net = vec![Frame::new(1, "net.go", "read", 10), Frame::new(2, "main.go", "main", 5)];
        let chan = vec![Frame::new(3, "chan.go", "recv", 7), Frame::new(2, "main.go", "main", 5)];

        let mut builder = ProfileBuilder::new();
        builder.add_sample(&net, 2, 3_000_000);
        builder.add_sample(&chan, 1, 9_000_000);
        builder.finish()
    }

    #[test]
    fn test_hottest_stacks_order() {
        let stacks = hottest_stacks(&profile());
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].stack, "main;recv");
        assert_eq!(stacks[0].leaf, "recv");
        assert_eq!(stacks[0].delay, 9_000_000);
        assert_eq!(stacks[1].count, 2);
    }

    #[test]
    fn test_summary_limits_lines() {
        let summary = generate_text_summary(&profile(), 1);
        assert!(summary.contains("main;recv"));
        assert!(!summary.contains("main;read"));
        assert!(summary.contains("Showing top 1 of 2"));
    }

    #[test]
    fn test_summary_empty_profile() {
        let summary = generate_text_summary(&Profile::new(), 10);
        assert!(summary.contains("HOTTEST STACKS"));
        assert!(!summary.contains("Showing top"));
    }

    #[test]
    fn test_truncate_left() {
        assert_eq!(truncate_left("abc", 5), "abc");
        assert_eq!(truncate_left("abcdefgh", 6), "...fgh");
    }
}
