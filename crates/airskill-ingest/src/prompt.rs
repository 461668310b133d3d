/// Fewest and most skills requested per repository.
pub const MIN_SKILLS: usize = 3;
pub const MAX_SKILLS: usize = 5;

/// System instruction: the task, the rules and the output contract that
/// [`crate::parser::parse_response`] accepts.
pub fn ingest_system_prompt(repo_name: &str) -> String {
    format!(
        r#"You are an expert at reverse-engineering software projects into reusable knowledge.
You will receive a digest of a repository. Distill {MIN_SKILLS} to {MAX_SKILLS} independent, reusable,
expert-level skills from it: architecture patterns, design decisions, domain concepts and
best practices that apply to any project in the same domain.

Rules:
- Skills are standalone. Name and describe them by domain or pattern
  (for example multi-agent-broadcast-design, message-envelope-normalization,
  streaming-llm-debugging), never by the project.
- Never mention the repository name "{repo_name}", its product name, or any other specific
  project in slugs or bodies. Write general principles, design points, steps and tables.
- Each skill must be substantial: several sections with lists, tables or steps, not one
  or two sentences.

Output format (follow exactly):
1) First line: Group: <topic-slug>
   topic-slug is a short English name for the domain (for example multi-agent-messaging,
   llm-observability), not the repository name.
2) After a blank line, {MIN_SKILLS} to {MAX_SKILLS} skill blocks shaped like this:

## Skill 1: slug-here
System Prompt:
You are an expert on [domain]. Use this skill when [typical situation].

When to use this skill:
- [situation 1]
- [situation 2]

Core principles / Rules / Design points:
- [principle 1]
- [principle 2]

[optional: tables, steps, examples]

## Skill 2: another-slug
System Prompt:
...

Slugs are lowercase English words joined by hyphens; never use the slug "index".
"#
    )
}

/// User message carrying the repository digest.
pub fn ingest_prompt(context: &str) -> String {
    format!(
        "Repository digest (for analysis only; do not cite its project name):\n---\n{context}\n---\n\
         Reply with the Group line, a blank line, then the skill blocks. No other commentary.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_contract() {
        let system = ingest_system_prompt("demo-repo");
        assert!(system.contains("Group: <topic-slug>"));
        assert!(system.contains("## Skill 1: slug-here\nSystem Prompt:"));
        assert!(system.contains("\"demo-repo\""));
        assert!(system.contains("3 to 5"));
    }

    #[test]
    fn prompt_embeds_context() {
        let prompt = ingest_prompt("## README\nhello");
        assert!(prompt.contains("---\n## README\nhello\n---\n"));
        assert!(prompt.ends_with("No other commentary.\n"));
    }
}
