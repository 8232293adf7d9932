use super::{CssTransform, TransformContext, TransformError, TransformOutput};
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Runs an external program as the base transform.
///
/// The stylesheet is written to the program's stdin and the compiled CSS is read
/// from its stdout, e.g. `tailwindcss --input - --output -`. The program runs in
/// the entry file's directory so relative lookups behave as they would for the file.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Split a `[program, args...]` list; `None` when empty
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl CssTransform for ExternalCommand {
    fn name(&self) -> &str {
        &self.program
    }

    fn transform(
        &self,
        css: &str,
        cx: &TransformContext,
    ) -> Result<TransformOutput, TransformError> {
        debug!("Running `{} {}`", self.program, self.args.join(" "));

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cx.path.parent() {
            command.current_dir(dir);
        }

        let mut child = command.spawn()?;

        // Feed stdin from another thread so a large stdout can't fill the pipe and stall
        let writer = child.stdin.take().map(|mut stdin| {
            let input = css.to_string();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(result) => {
                    // A program that exits without reading all of stdin is judged by its status
                    if let Err(e) = result {
                        debug!("`{}` closed stdin early: {}", self.program, e);
                    }
                }
                Err(_) => debug!("stdin writer for `{}` panicked", self.program),
            }
        }

        if !output.status.success() {
            return Err(TransformError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(TransformOutput { css: String::from_utf8_lossy(&output.stdout).into_owned(), map: None })
    }
}
