//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imagoref", about = "Drop image files on an ImagoRef board")]
pub struct Cli {
    /// Print the keyboard shortcuts and exit
    #[arg(long)]
    pub shortcuts: bool,

    /// Image files to place on the board (png, jpg, webp, bmp, gif)
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_and_flag() {
        let cli = Cli::try_parse_from(["imagoref", "a.png", "b.jpg"]).unwrap();
        assert!(!cli.shortcuts);
        assert_eq!(cli.files, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);

        let cli = Cli::try_parse_from(["imagoref", "--shortcuts"]).unwrap();
        assert!(cli.shortcuts);
        assert!(cli.files.is_empty());
    }

    #[test]
    fn test_unknown_flag_is_not_a_file() {
        assert!(Cli::try_parse_from(["imagoref", "--shortcut", "a.png"]).is_err());
        let help = Cli::try_parse_from(["imagoref", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
