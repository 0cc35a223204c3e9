//! CLI argument parsing with clap.

use clap::Parser;

/// Generate images from text prompts with Gemini.
#[derive(Parser, Debug)]
#[command(name = "neongen", version, about)]
pub struct Cli {
    /// Text prompt describing the desired image.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Model name or short alias (defaults to the config file, then nano-banana).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Aspect ratio: 1:1, 3:4, 4:3, 9:16, 16:9.
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Convert the image to this format before saving: jpeg, png, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long, conflicts_with = "data_uri")]
    pub output: Option<String>,

    /// Print the image as a data URI on stdout instead of saving it.
    #[arg(long)]
    pub data_uri: bool,

    /// Read prompts from stdin, one per line, until EOF.
    #[arg(short, long, conflicts_with_all = ["prompt", "prompt_file", "output"])]
    pub interactive: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither prompt nor prompt-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string, use -p/--prompt-file, or run with --interactive",
            ))
        }
    }
}
