//! Binary analysis backends.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use crate::error::FeaturesError;

/// Printed between command outputs so one radare2 session can answer every
/// query.
const MARKER: &str = "__malgraph_section__";

/// Raw results of analysing one binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOutput {
    /// Global call graph in DOT syntax.
    pub call_graph_dot: String,
    /// Disassembly lines matching `syscall`.
    pub syscall_hits: Vec<String>,
    /// Disassembly lines matching `svc`.
    pub svc_hits: Vec<String>,
}

impl AnalysisOutput {
    /// Total syscall-like instructions found.
    pub fn num_syscalls(&self) -> usize {
        self.syscall_hits.len() + self.svc_hits.len()
    }
}

/// Something that can disassemble a binary and report its call graph and
/// system call sites.
pub trait BinaryAnalyzer {
    fn analyze(&self, path: &Path) -> Result<AnalysisOutput, FeaturesError>;
}

/// Runs the `r2` command line tool, one process per binary.
///
/// The session runs full analysis (`aaa`), prints the global call graph as
/// DOT (`agCd`), then searches the disassembly for `syscall` and `svc`
/// instructions (`/ad/`).
#[derive(Debug, Clone)]
pub struct Radare2 {
    program: PathBuf,
    dot_output: bool,
}

impl Default for Radare2 {
    fn default() -> Self {
        Self {
            program: PathBuf::from("r2"),
            dot_output: true,
        }
    }
}

impl Radare2 {
    /// Uses `program` instead of `r2` from `PATH`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Whether to also save the call graph next to the binary, as the
    /// binary's path with a `.dot` extension. On by default.
    #[must_use]
    pub fn with_dot_output(mut self, dot_output: bool) -> Self {
        self.dot_output = dot_output;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn commands() -> String {
        let marker = format!("?e {MARKER}");
        [
            "aaa",
            marker.as_str(),
            "agCd",
            marker.as_str(),
            "/ad/ syscall",
            marker.as_str(),
            "/ad/ svc",
        ]
        .join("; ")
    }
}

impl BinaryAnalyzer for Radare2 {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    fn analyze(&self, path: &Path) -> Result<AnalysisOutput, FeaturesError> {
        let program = self.program.display().to_string();
        if !path.is_file() {
            return Err(FeaturesError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such binary"),
            ));
        }

        debug!("running analysis");
        let output = Command::new(&self.program)
            .arg("-q")
            .arg("-e")
            .arg("scr.color=0")
            .arg("-c")
            .arg(Self::commands())
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                FeaturesError::tool(&program, format!("failed to start: {err}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FeaturesError::tool(
                &program,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let analysis = split_sections(&stdout)
            .map_err(|message| FeaturesError::tool(&program, message))?;
        debug!(
            dot_bytes = analysis.call_graph_dot.len(),
            syscalls = analysis.num_syscalls(),
            "analysis finished"
        );

        if self.dot_output {
            let dot_path = path.with_extension("dot");
            fs::write(&dot_path, &analysis.call_graph_dot)
                .map_err(|err| FeaturesError::io(&dot_path, err))?;
        }
        Ok(analysis)
    }
}

/// Splits a session transcript at the marker lines. Anything printed before
/// the first marker is analysis chatter and is dropped.
fn split_sections(stdout: &str) -> Result<AnalysisOutput, String> {
    let mut sections = vec![Vec::new()];
    for line in stdout.lines() {
        if line.trim_end() == MARKER {
            sections.push(Vec::new());
        } else if let Some(section) = sections.last_mut() {
            section.push(line);
        }
    }

    let [_, dot, syscall, svc] = sections.as_slice() else {
        return Err(format!(
            "expected 3 section markers in output, found {}",
            sections.len() - 1
        ));
    };
    let hits = |lines: &[&str]| -> Vec<String> {
        lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| (*line).to_owned())
            .collect()
    };
    Ok(AnalysisOutput {
        call_graph_dot: dot.join("\n"),
        syscall_hits: hits(syscall),
        svc_hits: hits(svc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_separated_by_markers() {
        assert_eq!(
            Radare2::commands(),
            format!(
                "aaa; ?e {MARKER}; agCd; ?e {MARKER}; /ad/ syscall; ?e {MARKER}; /ad/ svc"
            )
        );
    }

    #[test]
    fn split_sections_counts_non_empty_hits() {
        let stdout = format!(
            "[x] Analyze all flags\n{MARKER}\ndigraph code {{\n\"a\" -> \"b\";\n}}\n\
             {MARKER}\n0x1000 # 2: syscall\n\n0x1100 # 2: syscall\n{MARKER}\n"
        );
        let output = split_sections(&stdout).unwrap();

        assert_eq!(output.call_graph_dot, "digraph code {\n\"a\" -> \"b\";\n}");
        assert_eq!(output.syscall_hits.len(), 2);
        assert!(output.svc_hits.is_empty());
        assert_eq!(output.num_syscalls(), 2);
    }

    #[test]
    fn split_sections_requires_every_marker() {
        let err = split_sections(&format!("{MARKER}\ndigraph {{}}\n")).unwrap_err();
        assert!(err.contains("found 1"));
    }

    #[test]
    fn missing_binary_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Radare2::default()
            .analyze(&dir.path().join("absent"))
            .unwrap_err();
        assert!(err.is_io());
    }

    /// Drives a stand-in `r2` script. Every process spawn lives in this one
    /// test so no other test thread forks while the script is being written.
    #[cfg(unix)]
    #[test]
    fn fake_radare2_session() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("sample.bin");
        fs::write(&binary, b"\x7fELF").unwrap();

        let script = dir.path().join("fake-r2");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 echo 'INFO: analysing'\n\
                 echo '{MARKER}'\n\
                 echo 'digraph code {{'\n\
                 echo '  \"0x1000\" -> \"0x2000\";'\n\
                 echo '}}'\n\
                 echo '{MARKER}'\n\
                 echo '0x1004 # 2: syscall'\n\
                 echo '{MARKER}'\n\
                 echo '0x3000 # 4: svc 0'\n\
                 echo '0x3010 # 4: svc 0'\n"
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let analysis = Radare2::new(&script).analyze(&binary).unwrap();
        assert_eq!(analysis.num_syscalls(), 3);
        let saved = fs::read_to_string(dir.path().join("sample.dot")).unwrap();
        assert_eq!(saved, analysis.call_graph_dot);

        fs::remove_file(dir.path().join("sample.dot")).unwrap();
        Radare2::new(&script)
            .with_dot_output(false)
            .analyze(&binary)
            .unwrap();
        assert!(!dir.path().join("sample.dot").exists());

        let failing = dir.path().join("failing-r2");
        fs::write(&failing, "#!/bin/sh\necho 'cannot open file' >&2\nexit 3\n")
            .unwrap();
        fs::set_permissions(&failing, fs::Permissions::from_mode(0o755)).unwrap();
        let err = Radare2::new(&failing).analyze(&binary).unwrap_err();
        assert!(err.is_tool());
        assert!(err.to_string().contains("cannot open file"));

        let err = Radare2::new(dir.path().join("no-such-r2"))
            .analyze(&binary)
            .unwrap_err();
        assert!(err.is_tool());
    }
}
