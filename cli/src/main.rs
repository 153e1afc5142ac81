//! LaTech CLI - calls the LaTech API and prints the results.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use latech_core::config::BASE_URL_ENV;
use latech_core::render::{render_outcome, LOADING};
use latech_core::{ApiClient, ClientConfig, PreprocessOptions, PreprocessResize, UreqTransport};

/// LaTech CLI - API demo and job inspection tool
#[derive(Parser, Debug)]
#[command(name = "latech")]
#[command(about = "CLI for the LaTech API", long_about = None)]
struct Cli {
    /// API base URL, prepended verbatim to every request path
    #[arg(short, long, env = BASE_URL_ENV, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check API health
    Health,

    /// Send a message to the echo endpoint
    Echo {
        /// Message to echo (surrounding whitespace is trimmed)
        message: String,
    },

    /// List all jobs
    Jobs,

    /// Get job status
    Status {
        /// Job ID
        job_id: String,
    },

    /// Clean up a job's uploaded image
    Preprocess {
        /// Job ID
        job_id: String,

        /// Keep colour instead of converting to grayscale
        #[arg(long)]
        no_grayscale: bool,

        /// Apply denoising
        #[arg(long)]
        denoise: bool,

        /// Binarization threshold (0-255)
        #[arg(long)]
        threshold: Option<u8>,

        /// Resize width in pixels
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Resize height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },

    /// Convert a job's preprocessed image to LaTeX
    Convert {
        /// Job ID
        job_id: String,
    },

    /// Compile a job's LaTeX to PDF
    Compile {
        /// Job ID
        job_id: String,
    },

    /// Print LaTeX source
    Latex {
        /// LaTeX document ID
        latex_id: String,
    },

    /// Download a compiled PDF
    Pdf {
        /// PDF ID
        pdf_id: String,

        /// File to write the PDF to
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("latech=info,latech_core=info")))
        .with_writer(std::io::stderr)
        .init();

    let client = ApiClient::new(&ClientConfig::new(cli.base_url));
    let transport = UreqTransport::new();
    debug!(base_url = client.base_url(), "client ready");

    match cli.command {
        Commands::Health => {
            info!("{LOADING}");
            println!("{}", render_outcome(&client.health(&transport)));
        }
        Commands::Echo { message } => {
            let message = echo_message(&message).ok_or("message must not be empty")?;
            info!("{LOADING}");
            println!("{}", render_outcome(&client.echo(&transport, message)));
        }
        Commands::Jobs => {
            let jobs = client.get_jobs(&transport)?;
            if jobs.is_empty() {
                println!("No jobs found.");
            }
            for job in jobs {
                println!(
                    "{}  {}  latex={}  pdf={}",
                    job.job_id,
                    job.status,
                    job.latex_id.as_deref().unwrap_or("-"),
                    job.pdf_id.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Status { job_id } => {
            let status = client.get_status(&transport, &job_id)?;
            println!("State:    {}", status.state);
            println!("Progress: {}%", status.progress);
            if let Some(error) = status.error {
                println!("Error:    {error}");
            }
        }
        Commands::Preprocess {
            job_id,
            no_grayscale,
            denoise,
            threshold,
            width,
            height,
        } => {
            let options = PreprocessOptions {
                grayscale: !no_grayscale,
                denoise,
                threshold,
                resize: width.zip(height).map(|(width, height)| PreprocessResize { width, height }),
            };
            let ack = client.preprocess(&transport, &job_id, &options)?;
            println!("Preprocessing queued for job {}", ack.job_id);
        }
        Commands::Convert { job_id } => {
            let ack = client.convert(&transport, &job_id)?;
            println!("Conversion queued for job {}", ack.job_id);
        }
        Commands::Compile { job_id } => {
            let ack = client.compile(&transport, &job_id)?;
            println!("Compilation queued for job {}", ack.job_id);
        }
        Commands::Latex { latex_id } => {
            print!("{}", client.get_latex(&transport, &latex_id)?);
        }
        Commands::Pdf { pdf_id, output } => {
            let bytes = client.get_pdf(&transport, &pdf_id)?;
            std::fs::write(&output, &bytes)?;
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
    }

    Ok(())
}

/// The trimmed message, or `None` if nothing is left to send.
fn echo_message(raw: &str) -> Option<&str> {
    let message = raw.trim();
    (!message.is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_message_is_trimmed() {
        assert_eq!(echo_message("  hi \n"), Some("hi"));
    }

    #[test]
    fn blank_echo_message_is_rejected() {
        assert_eq!(echo_message("   "), None);
        assert_eq!(echo_message(""), None);
    }

    #[test]
    fn parses_echo_with_base_url() {
        let cli = Cli::try_parse_from(["latech", "--base-url", "http://h:1", "echo", "hello"]).unwrap();
        assert_eq!(cli.base_url, "http://h:1");
        assert!(matches!(cli.command, Commands::Echo { ref message } if message == "hello"));
    }

    #[test]
    fn pdf_requires_output() {
        assert!(Cli::try_parse_from(["latech", "pdf", "p1"]).is_err());
        let cli = Cli::try_parse_from(["latech", "pdf", "p1", "-o", "out.pdf"]).unwrap();
        assert!(matches!(cli.command, Commands::Pdf { ref output, .. } if output == &PathBuf::from("out.pdf")));
    }

    #[test]
    fn preprocess_resize_needs_both_sides() {
        assert!(Cli::try_parse_from(["latech", "preprocess", "j1", "--width", "640"]).is_err());
        let cli = Cli::try_parse_from([
            "latech", "preprocess", "j1", "--denoise", "--width", "640", "--height", "480",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Preprocess { denoise: true, no_grayscale: false, width: Some(640), height: Some(480), .. }
        ));
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
