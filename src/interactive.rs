use crate::config::{Config, OutputFormat};
use crate::input::MediaSource;
use crate::pipeline::format_size;
use console::style;
use dialoguer::{Confirm, FuzzySelect, Input, Password, Select};
use std::fs;
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "mkv", "webm", "mpeg", // Video
    "mp3", "mpga", "wav", "flac", "m4a", "ogg", // Audio
];

const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ja", "Japanese"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("zh", "Chinese"),
    ("ko", "Korean"),
    ("pt", "Portuguese"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
];

pub struct InteractiveResult {
    pub source: MediaSource,
    pub config: Config,
    pub format: OutputFormat,
}

pub fn run_interactive_wizard(config: Config) -> anyhow::Result<InteractiveResult> {
    print_header();

    let mut config = setup_api_key(config)?;

    let source = select_source()?;

    config.language = select_language(config.language.as_deref())?;

    let format = select_output_format(config.default_format)?;

    print_summary(&source, config.language.as_deref(), format);

    if !Confirm::new()
        .with_prompt("Get transcript?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    Ok(InteractiveResult {
        source,
        config,
        format,
    })
}

fn print_header() {
    println!();
    println!("{}", style("╔═══════════════════════════════════════╗").cyan());
    println!("{}", style("║     srtlist - Whisper transcripts     ║").cyan());
    println!("{}", style("╚═══════════════════════════════════════╝").cyan());
    println!();
}

fn setup_api_key(mut config: Config) -> anyhow::Result<Config> {
    if config.openai_api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        println!("{} API key configured", style("✓").green());
        return Ok(config);
    }

    println!("{} OpenAI API key not found", style("!").yellow());
    println!("  Get one at: https://platform.openai.com/api-keys\n");

    let api_key: String = Password::new()
        .with_prompt("Enter your OpenAI API key")
        .interact()?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key is required");
    }

    config.openai_api_key = Some(api_key.trim().to_string());

    if Confirm::new()
        .with_prompt("Save API key to config file?")
        .default(true)
        .interact()?
    {
        save_config(&config)?;
        println!("{} API key saved to config\n", style("✓").green());
    }

    Ok(config)
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("srtlist");
        fs::create_dir_all(&app_dir)?;

        let config_path = app_dir.join("config.toml");
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn select_source() -> anyhow::Result<MediaSource> {
    let kinds = ["Upload a local file", "Paste a file URL"];

    let selection = Select::new()
        .with_prompt("Where is the audio/video?")
        .items(&kinds)
        .default(0)
        .interact()?;

    if selection == 1 {
        let url: String = Input::new()
            .with_prompt("File URL")
            .interact_text()?;
        return Ok(MediaSource::from_parts(None, Some(url))?);
    }

    Ok(MediaSource::File(select_source_file()?))
}

fn select_source_file() -> anyhow::Result<PathBuf> {
    println!("\n{}", style("Select source file:").bold());

    let files = scan_media_files(Path::new("."))?;

    if files.is_empty() {
        println!("  No media files found in current directory.\n");
        return prompt_path();
    }

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter custom path...".to_string());

    let selection = FuzzySelect::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        prompt_path()
    } else {
        Ok(files[selection].clone())
    }
}

fn prompt_path() -> anyhow::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Enter file path")
        .interact_text()?;
    let path = PathBuf::from(path.trim());
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn scan_media_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn select_language(current: Option<&str>) -> anyhow::Result<Option<String>> {
    let mut options = vec!["Auto-detect".to_string()];
    options.extend(
        LANGUAGES
            .iter()
            .map(|(code, name)| format!("{} ({})", name, code)),
    );
    options.push("Other (enter code)...".to_string());

    let default = current
        .and_then(|code| LANGUAGES.iter().position(|(c, _)| *c == code))
        .map(|i| i + 1)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Spoken language")
        .items(&options)
        .default(default)
        .interact()?;

    if selection == 0 {
        Ok(None)
    } else if selection == options.len() - 1 {
        let code: String = Input::new()
            .with_prompt("Enter language code (e.g., 'vi' for Vietnamese)")
            .interact_text()?;
        Ok(Some(code.trim().to_lowercase()))
    } else {
        Ok(Some(LANGUAGES[selection - 1].0.to_string()))
    }
}

fn select_output_format(default: OutputFormat) -> anyhow::Result<OutputFormat> {
    let formats = [
        ("Text", "Timestamp and caption per row", OutputFormat::Text),
        ("JSON", "Programmatic access", OutputFormat::Json),
    ];

    let items: Vec<String> = formats
        .iter()
        .map(|(name, desc, _)| format!("{} - {}", name, desc))
        .collect();

    let selection = Select::new()
        .with_prompt("Select output format")
        .items(&items)
        .default(formats.iter().position(|f| f.2 == default).unwrap_or(0))
        .interact()?;

    Ok(formats[selection].2)
}

fn print_summary(source: &MediaSource, language: Option<&str>, format: OutputFormat) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Source:    {}", style(source).cyan());
    println!(
        "  Language:  {}",
        language.map(get_language_name).unwrap_or_else(|| "auto".to_string())
    );
    println!("  Format:    {}", format);
    println!();
}

fn get_language_name(code: &str) -> String {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(c, n)| format!("{} ({})", n, c))
        .unwrap_or_else(|| code.to_string())
}
