use std::collections::BTreeMap;
use std::path::PathBuf;

use super::PipelineError;

/// One `--op -key=value ...` group of the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    /// Operation name without the leading dashes.
    pub name: String,
    /// Arguments; flags given without `=` map to an empty string.
    pub args: BTreeMap<String, String>,
}

impl OperationRequest {
    /// Create a request without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    /// Builder style argument setter.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    /// Operation requests in submission order.
    pub requests: Vec<OperationRequest>,
    /// Path of the input image.
    pub input: PathBuf,
    /// Path of the optional comparison image.
    pub comparison: Option<PathBuf>,
    /// The operation catalogue was requested.
    pub help: bool,
}

/// `--help` is never an operation name, while `-h` only means help before the first operation.
fn wants_help(tokens: &[String]) -> bool {
    tokens.iter().any(|t| t == "--help")
        || tokens
            .iter()
            .take_while(|t| !t.starts_with("--"))
            .any(|t| t == "-h")
}

/// Parse the command line tokens that follow the program name.
///
/// The grammar is `--op [-key=value | -flag]* ... [comparison.bmp] input.bmp`:
///
/// * a token starting with `--` opens a new operation,
/// * a token starting with a single `-` sets an argument of the current operation,
/// * the last positional token is the input image and a positional ending in `.bmp`
///   immediately before it is the comparison image.
///
/// `--help` anywhere, or `-h` before the first operation, short-circuits to
/// [`Invocation::help`].
///
/// # Errors
///
/// Returns [`PipelineError::Parse`] for arguments before any operation, empty names, stray
/// positionals or a missing input path.
pub fn parse_args<I, S>(args: I) -> Result<Invocation, PipelineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
    if wants_help(&tokens) {
        return Ok(Invocation {
            help: true,
            ..Default::default()
        });
    }

    let mut requests: Vec<OperationRequest> = Vec::new();
    let mut positionals: Vec<(usize, &str)> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if let Some(name) = token.strip_prefix("--") {
            if name.is_empty() {
                return Err(PipelineError::Parse("empty operation name '--'".to_string()));
            }
            requests.push(OperationRequest::new(name));
        } else if let Some(arg) = token.strip_prefix('-').filter(|a| !a.is_empty()) {
            let request = requests.last_mut().ok_or_else(|| {
                PipelineError::Parse(format!("argument '{token}' given before any operation"))
            })?;
            let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
            if key.is_empty() {
                return Err(PipelineError::Parse(format!("argument '{token}' has no name")));
            }
            request.args.insert(key.to_string(), value.to_string());
        } else {
            positionals.push((index, token.as_str()));
        }
    }

    let Some(&(last_index, input)) = positionals.last() else {
        return Err(PipelineError::Parse("missing input image path".to_string()));
    };
    let comparison = match positionals.as_slice() {
        [_] => None,
        [(index, path), _]
            if *index + 1 == last_index && path.to_ascii_lowercase().ends_with(".bmp") =>
        {
            Some(PathBuf::from(path))
        }
        _ => {
            let stray: Vec<&str> = positionals[..positionals.len() - 1]
                .iter()
                .map(|(_, p)| *p)
                .collect();
            return Err(PipelineError::Parse(format!(
                "unexpected positional arguments: {}",
                stray.join(" ")
            )));
        }
    };
    if requests.is_empty() {
        return Err(PipelineError::Parse("no operation requested".to_string()));
    }

    Ok(Invocation {
        requests,
        input: PathBuf::from(input),
        comparison,
        help: false,
    })
}
