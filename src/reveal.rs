use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::error::{Result, TreeError};
use crate::tree::EntryKind;

/// Host family, picked by OS name at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux, the BSDs and anything else with an `xdg-open`
    Other,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    pub fn from_os_name(name: &str) -> Self {
        match name {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            _ => Self::Other,
        }
    }
}

/// External command that shows an entry in the platform file manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealCommand {
    pub program: String,
    pub args: Vec<OsString>,
}

impl RevealCommand {
    /// Build the reveal command for an absolute `path`.
    ///
    /// Explorer and Finder select the entry itself. `xdg-open` can only open
    /// folders, so files are revealed through their containing folder.
    pub fn for_entry(platform: Platform, path: &Path, kind: EntryKind) -> Self {
        match platform {
            Platform::Windows => Self {
                program: "explorer".to_string(),
                args: vec![OsString::from("/select,"), path.as_os_str().to_owned()],
            },
            Platform::MacOs => Self {
                program: "open".to_string(),
                args: vec![OsString::from("-R"), path.as_os_str().to_owned()],
            },
            Platform::Other => {
                let folder = match kind {
                    EntryKind::Folder => path,
                    EntryKind::File => path.parent().unwrap_or(path),
                };
                Self {
                    program: "xdg-open".to_string(),
                    args: vec![folder.as_os_str().to_owned()],
                }
            }
        }
    }

    /// Run the command and wait for it.
    ///
    /// Only a failure to launch is an error; launchers such as `explorer`
    /// report non-zero exit codes even when they succeed.
    pub fn run(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| TreeError::Reveal {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            tracing::debug!(
                program = %self.program,
                ?status,
                "Reveal command exited unsuccessfully"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_platform_from_os_name() {
        assert_eq!(Platform::from_os_name("windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os_name("linux"), Platform::Other);
        assert_eq!(Platform::from_os_name("freebsd"), Platform::Other);
    }

    #[test]
    fn test_xdg_open_file_reveals_containing_folder() {
        let path = PathBuf::from("/home/user/docs/report.pdf");
        let cmd = RevealCommand::for_entry(Platform::Other, &path, EntryKind::File);

        assert_eq!(cmd.program, "xdg-open");
        assert_eq!(cmd.args, vec![OsString::from("/home/user/docs")]);
    }

    #[test]
    fn test_xdg_open_folder_reveals_itself() {
        let path = PathBuf::from("/home/user/docs");
        let cmd = RevealCommand::for_entry(Platform::Other, &path, EntryKind::Folder);

        assert_eq!(cmd.args, vec![OsString::from("/home/user/docs")]);
    }

    #[test]
    fn test_explorer_selects_entry() {
        let path = PathBuf::from(r"C:\Users\me\notes.txt");
        let cmd = RevealCommand::for_entry(Platform::Windows, &path, EntryKind::File);

        assert_eq!(cmd.program, "explorer");
        assert_eq!(
            cmd.args,
            vec![OsString::from("/select,"), OsString::from(r"C:\Users\me\notes.txt")]
        );
    }

    #[test]
    fn test_finder_reveals_entry() {
        let path = PathBuf::from("/Users/me/notes.txt");
        let cmd = RevealCommand::for_entry(Platform::MacOs, &path, EntryKind::File);

        assert_eq!(cmd.program, "open");
        assert_eq!(
            cmd.args,
            vec![OsString::from("-R"), OsString::from("/Users/me/notes.txt")]
        );
    }

    #[test]
    fn test_missing_program_is_reported() {
        let cmd = RevealCommand {
            program: "foldertree-no-such-launcher".to_string(),
            args: Vec::new(),
        };

        let err = cmd.run().unwrap_err();
        assert!(matches!(err, TreeError::Reveal { .. }));
    }
}
