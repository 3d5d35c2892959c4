//! `{name}` placeholders in compiler and runtime arguments

use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Values substituted into argument templates.
///
/// Recognized names: `{source}`, `{output}`, `{config}`, `{out_dir}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub source: String,
    pub output: String,
    pub config: String,
    pub out_dir: String,
}

impl Placeholders {
    pub fn new(source: &Path, output: &Path, config: &Path, out_dir: &Path) -> Self {
        Self {
            source: source.display().to_string(),
            output: output.display().to_string(),
            config: config.display().to_string(),
            out_dir: out_dir.display().to_string(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "source" => Some(&self.source),
            "output" => Some(&self.output),
            "config" => Some(&self.config),
            "out_dir" => Some(&self.out_dir),
            _ => None,
        }
    }

    /// Expand every `{name}` in `template`.
    ///
    /// `{{` and `}}` produce literal braces; an unterminated `{` is kept as is.
    pub fn expand(&self, template: &str) -> ConfigResult<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find(['{', '}']) {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];

            if tail.starts_with("{{") || tail.starts_with("}}") {
                out.push_str(&tail[..1]);
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with('}') {
                out.push('}');
                rest = &tail[1..];
                continue;
            }

            match tail.find('}') {
                Some(close) => {
                    let name = &tail[1..close];
                    let value = self
                        .lookup(name)
                        .ok_or_else(|| ConfigError::UnknownPlaceholder {
                            field: template.to_string(),
                            name: name.to_string(),
                        })?;
                    out.push_str(value);
                    rest = &tail[close + 1..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Expand a whole argument list
    pub fn expand_all(&self, args: &[String]) -> ConfigResult<Vec<String>> {
        args.iter().map(|arg| self.expand(arg)).collect()
    }
}

/// Check that `template` only names known placeholders.
pub fn check(field: &str, template: &str) -> ConfigResult<()> {
    let probe = Placeholders::default();
    match probe.expand(template) {
        Err(ConfigError::UnknownPlaceholder { name, .. }) => Err(ConfigError::UnknownPlaceholder {
            field: field.to_string(),
            name,
        }),
        other => other.map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn values() -> Placeholders {
        Placeholders::new(
            Path::new("src/math.test.ts"),
            Path::new("dist/math.test.js"),
            Path::new("tsconfig.json"),
            Path::new("dist"),
        )
    }

    #[rstest]
    #[case("{source}", "src/math.test.ts")]
    #[case("--outDir={out_dir}", "--outDir=dist")]
    #[case("-p {config} {output}", "-p tsconfig.json dist/math.test.js")]
    #[case("plain", "plain")]
    #[case("{{source}}", "{source}")]
    #[case("dangling {", "dangling {")]
    fn test_expand(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(values().expand(template).unwrap(), expected);
    }

    #[test]
    fn test_unknown_placeholder() {
        match values().expand("{nope}") {
            Err(ConfigError::UnknownPlaceholder { name, .. }) => assert_eq!(name, "nope"),
            other => panic!("Expected UnknownPlaceholder, got {:?}", other),
        }
    }

    #[test]
    fn test_check_reports_field() {
        assert!(check("compiler.args", "{source}").is_ok());
        let err = check("runtime.args", "{sauce}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown placeholder '{sauce}' in runtime.args"
        );
    }
}
