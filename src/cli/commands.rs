use crate::models::Snippet;
use colored::Colorize;
use std::path::Path;
use uuid::Uuid;

/// Resolves a 1-based list number or a snippet id.
pub fn find_snippet<'a>(snippets: &'a [Snippet], target: &str) -> Option<&'a Snippet> {
    if let Ok(id) = Uuid::parse_str(target) {
        return snippets.iter().find(|snippet| snippet.id == id);
    }

    target
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| snippets.get(index))
}

/// Prints every snippet with its number, language and creation date
pub fn list_snippets(snippets: &[Snippet]) {
    if snippets.is_empty() {
        println!("{}  No snippets saved yet", "┃".bright_magenta());
        return;
    }

    println!(
        "{}  {} ({})",
        "┃".bright_magenta(),
        "SNIPPETS".bright_green().bold(),
        snippets.len()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    for (index, snippet) in snippets.iter().enumerate() {
        println!(
            "{}  {}. {} {} {}",
            "┃".bright_magenta(),
            (index + 1).to_string().yellow(),
            snippet.title.bright_white(),
            format!("[{}]", snippet.language.display_name()).bright_blue(),
            snippet
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );

        let preview = snippet.preview();
        if !preview.is_empty() {
            println!("{}     {}", "┃".bright_magenta(), preview.bright_black());
        }
    }
}

/// Shows the content of a single snippet
pub fn show_snippet(snippets: &[Snippet], target: &str) {
    let Some(snippet) = find_snippet(snippets, target) else {
        println!(
            "{}  No snippet found for: {}",
            "┃".bright_magenta(),
            target
        );
        if !snippets.is_empty() {
            println!(
                "{}  Use a number between 1 and {} or a snippet id",
                "┃".bright_magenta(),
                snippets.len()
            );
        }
        return;
    };

    println!(
        "{}  {} {}",
        "┃".bright_magenta(),
        "SNIPPET".bright_green().bold(),
        snippet.title.bold()
    );
    println!("{}", "─".repeat(60).bright_magenta());
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Language".bright_yellow(),
        snippet.language.display_name()
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Created".bright_cyan(),
        snippet.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "ID".bright_black(),
        snippet.id
    );
    println!("{}", "─".repeat(60).bright_magenta());

    for line in snippet.content.lines() {
        println!("{}  {}", "┃".bright_magenta(), line);
    }
}

pub fn print_paths(data_file: &Path, config_file: Option<&Path>) {
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Snippets".bright_yellow(),
        data_file.display()
    );

    let config = config_file
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| String::from("(no config directory)"));
    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Config".bright_yellow(),
        config
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnippetLanguage;

    fn sample() -> Vec<Snippet> {
        vec![
            Snippet::new("one".into(), "a".into(), SnippetLanguage::Text),
            Snippet::new("two".into(), "b".into(), SnippetLanguage::Go),
        ]
    }

    #[test]
    fn test_find_by_number() {
        let snippets = sample();
        assert_eq!(find_snippet(&snippets, "2").unwrap().title, "two");
        assert!(find_snippet(&snippets, "0").is_none());
        assert!(find_snippet(&snippets, "3").is_none());
        assert!(find_snippet(&snippets, "two").is_none());
    }

    #[test]
    fn test_find_by_id() {
        let snippets = sample();
        let id = snippets[0].id.to_string();
        assert_eq!(find_snippet(&snippets, &id).unwrap().title, "one");
        assert!(find_snippet(&snippets, &Uuid::new_v4().to_string()).is_none());
    }
}
