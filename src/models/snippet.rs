use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single saved code fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub language: SnippetLanguage,
    pub created_at: DateTime<Utc>,
}

impl Snippet {
    pub fn new(title: String, content: String, language: SnippetLanguage) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            language,
            created_at: Utc::now(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// First non-blank line of the content, used as a list preview.
    pub fn preview(&self) -> &str {
        self.content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Language tag of a snippet. Persisted as a lowercase tag such as `"go"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SnippetLanguage {
    Rust,
    JavaScript,
    TypeScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    PHP,
    Ruby,
    Swift,
    Kotlin,
    HTML,
    CSS,
    SQL,
    Bash,
    Yaml,
    Json,
    Xml,
    Markdown,
    Toml,
    Text,
    Other(String),
}

impl SnippetLanguage {
    /// Parse a language tag. Accepts canonical tags, common names and file
    /// extensions; anything unknown is kept verbatim as `Other`.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_lowercase();
        match normalized.as_str() {
            "rust" | "rs" => SnippetLanguage::Rust,
            "javascript" | "js" => SnippetLanguage::JavaScript,
            "typescript" | "ts" => SnippetLanguage::TypeScript,
            "python" | "py" => SnippetLanguage::Python,
            "go" | "golang" => SnippetLanguage::Go,
            "java" => SnippetLanguage::Java,
            "c" | "h" => SnippetLanguage::C,
            "cpp" | "c++" | "cc" | "cxx" => SnippetLanguage::Cpp,
            "csharp" | "c#" | "cs" => SnippetLanguage::CSharp,
            "php" => SnippetLanguage::PHP,
            "ruby" | "rb" => SnippetLanguage::Ruby,
            "swift" => SnippetLanguage::Swift,
            "kotlin" | "kt" => SnippetLanguage::Kotlin,
            "html" | "htm" => SnippetLanguage::HTML,
            "css" => SnippetLanguage::CSS,
            "sql" => SnippetLanguage::SQL,
            "bash" | "sh" | "shell" => SnippetLanguage::Bash,
            "yaml" | "yml" => SnippetLanguage::Yaml,
            "json" => SnippetLanguage::Json,
            "xml" => SnippetLanguage::Xml,
            "markdown" | "md" => SnippetLanguage::Markdown,
            "toml" => SnippetLanguage::Toml,
            "" | "text" | "txt" | "plain" => SnippetLanguage::Text,
            _ => SnippetLanguage::Other(normalized),
        }
    }

    /// Canonical persisted tag
    pub fn tag(&self) -> &str {
        match self {
            SnippetLanguage::Rust => "rust",
            SnippetLanguage::JavaScript => "javascript",
            SnippetLanguage::TypeScript => "typescript",
            SnippetLanguage::Python => "python",
            SnippetLanguage::Go => "go",
            SnippetLanguage::Java => "java",
            SnippetLanguage::C => "c",
            SnippetLanguage::Cpp => "cpp",
            SnippetLanguage::CSharp => "csharp",
            SnippetLanguage::PHP => "php",
            SnippetLanguage::Ruby => "ruby",
            SnippetLanguage::Swift => "swift",
            SnippetLanguage::Kotlin => "kotlin",
            SnippetLanguage::HTML => "html",
            SnippetLanguage::CSS => "css",
            SnippetLanguage::SQL => "sql",
            SnippetLanguage::Bash => "bash",
            SnippetLanguage::Yaml => "yaml",
            SnippetLanguage::Json => "json",
            SnippetLanguage::Xml => "xml",
            SnippetLanguage::Markdown => "markdown",
            SnippetLanguage::Toml => "toml",
            SnippetLanguage::Text => "text",
            SnippetLanguage::Other(tag) => tag,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SnippetLanguage::Rust => "Rust",
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::TypeScript => "TypeScript",
            SnippetLanguage::Python => "Python",
            SnippetLanguage::Go => "Go",
            SnippetLanguage::Java => "Java",
            SnippetLanguage::C => "C",
            SnippetLanguage::Cpp => "C++",
            SnippetLanguage::CSharp => "C#",
            SnippetLanguage::PHP => "PHP",
            SnippetLanguage::Ruby => "Ruby",
            SnippetLanguage::Swift => "Swift",
            SnippetLanguage::Kotlin => "Kotlin",
            SnippetLanguage::HTML => "HTML",
            SnippetLanguage::CSS => "CSS",
            SnippetLanguage::SQL => "SQL",
            SnippetLanguage::Bash => "Bash",
            SnippetLanguage::Yaml => "YAML",
            SnippetLanguage::Json => "JSON",
            SnippetLanguage::Xml => "XML",
            SnippetLanguage::Markdown => "Markdown",
            SnippetLanguage::Toml => "TOML",
            SnippetLanguage::Text => "Text",
            SnippetLanguage::Other(name) => name,
        }
    }

    /// Name of the syntect syntax definition for this language.
    /// `None` means plain text.
    pub fn syntax_name(&self) -> Option<&'static str> {
        match self {
            SnippetLanguage::Rust => Some("Rust"),
            SnippetLanguage::JavaScript => Some("JavaScript"),
            // syntect's default set ships no TypeScript grammar
            SnippetLanguage::TypeScript => Some("JavaScript"),
            SnippetLanguage::Python => Some("Python"),
            SnippetLanguage::Go => Some("Go"),
            SnippetLanguage::Java => Some("Java"),
            SnippetLanguage::C => Some("C"),
            SnippetLanguage::Cpp => Some("C++"),
            SnippetLanguage::CSharp => Some("C#"),
            SnippetLanguage::PHP => Some("PHP"),
            SnippetLanguage::Ruby => Some("Ruby"),
            SnippetLanguage::HTML => Some("HTML"),
            SnippetLanguage::CSS => Some("CSS"),
            SnippetLanguage::SQL => Some("SQL"),
            SnippetLanguage::Bash => Some("Bourne Again Shell (bash)"),
            SnippetLanguage::Yaml => Some("YAML"),
            SnippetLanguage::Json => Some("JSON"),
            SnippetLanguage::Xml => Some("XML"),
            SnippetLanguage::Markdown => Some("Markdown"),
            _ => None,
        }
    }
}

impl Default for SnippetLanguage {
    fn default() -> Self {
        SnippetLanguage::Text
    }
}

impl From<String> for SnippetLanguage {
    fn from(tag: String) -> Self {
        SnippetLanguage::from_tag(&tag)
    }
}

impl From<SnippetLanguage> for String {
    fn from(language: SnippetLanguage) -> Self {
        language.tag().to_string()
    }
}

impl std::fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
