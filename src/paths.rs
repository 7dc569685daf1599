//! Path expansion: environment variables, `~`, and absolutization.
//!
//! Profiles store already-expanded absolute paths, so expansion happens
//! exactly once — when a path is recorded. `$VAR` and `${VAR}` substitute
//! from the environment (unset variables expand to nothing), a leading `~`
//! maps to the home directory, and the result is absolutized against the
//! current directory and lexically cleaned. Trailing separators and `..`
//! segments are removed here because the parked-file naming appends a
//! suffix to the path as recorded.

use std::path::{Component, Path, PathBuf};
use std::{env, io, path};

#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("could not determine home directory")]
    HomeDirUnavailable,

    #[error("failed to resolve {path:?} against the current directory: {source}")]
    Absolute {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Expands `input` into a clean absolute path.
pub fn expand(input: &str) -> Result<PathBuf, ExpandError> {
    let expanded = expand_env_with(input, |name| env::var(name).ok());
    let with_home = expand_home(&expanded)?;
    let absolute = path::absolute(&with_home).map_err(|source| ExpandError::Absolute {
        path: with_home.clone(),
        source,
    })?;
    Ok(clean(&absolute))
}

/// Substitutes `$NAME` and `${NAME}` using `lookup`.
///
/// Names are ASCII alphanumerics and underscores. An unset variable expands
/// to the empty string; a `$` that starts no name is kept literally.
fn expand_env_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(i) = rest.find('$') {
        out.push_str(&rest[..i]);
        rest = &rest[i + 1..];
        if let Some(braced) = rest.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                rest = &braced[end + 1..];
            } else {
                // Unterminated brace: keep the text as written.
                out.push_str("${");
                rest = braced;
            }
        } else {
            let len = rest
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .count();
            if len == 0 {
                out.push('$');
            } else {
                out.push_str(&lookup(&rest[..len]).unwrap_or_default());
                rest = &rest[len..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Maps a leading `~` to the home directory.
fn expand_home(input: &str) -> Result<PathBuf, ExpandError> {
    if input == "~" {
        return dirs::home_dir().ok_or(ExpandError::HomeDirUnavailable);
    }
    if let Some(rest) = input.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ExpandError::HomeDirUnavailable)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(input))
}

/// Lexically removes `.` and `..` components. `..` above the root is
/// dropped.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOME_DIR" => Some("/home/me".to_string()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn plain_variable_is_substituted() {
        assert_eq!(expand_env_with("$HOME_DIR/rc", lookup), "/home/me/rc");
    }

    #[test]
    fn braced_variable_is_substituted() {
        assert_eq!(expand_env_with("${HOME_DIR}rc", lookup), "/home/merc");
    }

    #[test]
    fn unset_variable_expands_to_nothing() {
        assert_eq!(expand_env_with("/a/$MISSING/b", lookup), "/a//b");
    }

    #[test]
    fn dollar_without_a_name_is_kept() {
        assert_eq!(expand_env_with("/a/$/b$", lookup), "/a/$/b$");
    }

    #[test]
    fn unterminated_brace_is_kept() {
        assert_eq!(expand_env_with("/a/${oops", lookup), "/a/${oops");
    }

    #[test]
    fn clean_resolves_dot_and_dotdot() {
        assert_eq!(clean(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn expand_cleans_absolute_input() {
        let path = expand("/tmp/x/../y/.").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/y"));
    }

    #[test]
    fn expand_maps_tilde_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand("~/rc").unwrap(), home.join("rc"));
        assert_eq!(expand("~").unwrap(), clean(&home));
    }
}
