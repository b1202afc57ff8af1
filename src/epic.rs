//! Epic linkage: sub-issue specs and the task-list rewrite

use crate::manifest::IssueSpec;

/// Labels every sub-issue gets, before the epic's component labels
const SUB_ISSUE_LABELS: &[&str] = &["type: feature", "priority: medium"];

/// Spec for the sub-issue tracking `subtask` of `epic`
///
/// Component labels are inherited from the epic.
pub fn sub_issue(epic: &IssueSpec, epic_number: u64, subtask: &str) -> IssueSpec {
    let labels = SUB_ISSUE_LABELS
        .iter()
        .map(ToString::to_string)
        .chain(
            epic.labels
                .iter()
                .filter(|l| l.starts_with("component:"))
                .cloned(),
        )
        .collect();

    IssueSpec {
        title: subtask.to_string(),
        body: format!(
            "## Description\n{subtask}\n\n\
             ## Epic\nPart of #{epic_number} ({})\n\n\
             ## Acceptance criteria\n\
             - [ ] Implement the required functionality\n\
             - [ ] Document it\n\
             - [ ] Tick this task in the epic\n",
            epic.title
        ),
        labels,
        assignees: epic.assignees.clone(),
        milestone: epic.milestone.clone(),
        subtasks: Vec::new(),
        task_heading: epic.task_heading.clone(),
    }
}

/// Replace the list under `heading` with one linked task per sub-issue
///
/// Every line after the heading up to the next `## ` heading (or the end of
/// the body) is replaced. When the heading is absent a new section is
/// appended. Everything else in the body is kept as is.
pub fn rewrite_task_list(body: &str, heading: &str, tasks: &[(String, u64)]) -> String {
    let task_lines: Vec<String> = tasks
        .iter()
        .map(|(title, number)| format!("- [ ] {title} #{number}"))
        .collect();
    let lines: Vec<&str> = body.lines().collect();

    let Some(start) = lines.iter().position(|l| l.trim_end() == heading) else {
        let mut out = body.trim_end().to_string();
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(heading);
        out.push('\n');
        out.push_str(&task_lines.join("\n"));
        out.push('\n');
        return out;
    };

    let end = lines[start + 1..]
        .iter()
        .position(|l| l.starts_with("## "))
        .map_or(lines.len(), |offset| start + 1 + offset);

    let mut out: Vec<&str> = lines[..=start].to_vec();
    out.extend(task_lines.iter().map(String::as_str));
    if end < lines.len() {
        out.push("");
        out.extend(&lines[end..]);
    }

    let mut rewritten = out.join("\n");
    if body.ends_with('\n') || end == lines.len() {
        rewritten.push('\n');
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epic() -> IssueSpec {
        IssueSpec {
            title: "[EPIC] Infra".into(),
            body: String::new(),
            labels: vec![
                "effort: epic".into(),
                "component: docker".into(),
                "priority: high".into(),
                "component: database".into(),
            ],
            assignees: Vec::new(),
            milestone: None,
            subtasks: vec!["Compose".into(), "Networks".into()],
            task_heading: "## Tasks".into(),
        }
    }

    fn tasks() -> Vec<(String, u64)> {
        vec![("Compose".into(), 12), ("Networks".into(), 13)]
    }

    #[test]
    fn test_sub_issue_inherits_components() {
        let sub = sub_issue(&epic(), 11, "Compose");
        assert_eq!(sub.title, "Compose");
        assert_eq!(
            sub.labels,
            vec![
                "type: feature",
                "priority: medium",
                "component: docker",
                "component: database"
            ]
        );
        assert!(sub.body.contains("Part of #11"));
        assert!(!sub.is_epic());
    }

    #[test]
    fn test_rewrite_between_headings() {
        let body = "## Description\nInfra work\n\n## Tasks\n- [ ] Compose\n- [ ] Networks\n\n## Acceptance criteria\n- boots\n";
        let rewritten = rewrite_task_list(body, "## Tasks", &tasks());
        assert_eq!(
            rewritten,
            "## Description\nInfra work\n\n## Tasks\n- [ ] Compose #12\n- [ ] Networks #13\n\n## Acceptance criteria\n- boots\n"
        );
    }

    #[test]
    fn test_rewrite_last_section() {
        let body = "## Description\nx\n\n## Tasks\n- [ ] Compose";
        assert_eq!(
            rewrite_task_list(body, "## Tasks", &tasks()),
            "## Description\nx\n\n## Tasks\n- [ ] Compose #12\n- [ ] Networks #13\n"
        );
    }

    #[test]
    fn test_rewrite_appends_missing_heading() {
        assert_eq!(
            rewrite_task_list("Intro\n", "## Tasks", &tasks()),
            "Intro\n\n## Tasks\n- [ ] Compose #12\n- [ ] Networks #13\n"
        );
    }

    #[test]
    fn test_rewrite_is_stable() {
        let body = "## Tasks\n- [ ] old\n\n## Notes\nkeep\n";
        let once = rewrite_task_list(body, "## Tasks", &tasks());
        assert_eq!(rewrite_task_list(&once, "## Tasks", &tasks()), once);
    }
}
