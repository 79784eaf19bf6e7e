//! Structured build steps
//!
//! Detectors describe what a candidate does as a list of [`BuildStep`]s. Steps
//! are rendered to bash only when a script is materialized, which keeps the
//! detectors free of quoting concerns and lets recipe patches be checked
//! against plain text without running `sed`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

/// A single `-D<name>=<value>` argument passed to `cmake`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CMakeDefine {
    pub name: String,
    pub value: String,
}

impl CMakeDefine {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for CMakeDefine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-D{}={}", self.name, self.value)
    }
}

/// In-place text substitution applied to a build descriptor before building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "patch", rename_all = "snake_case")]
pub enum RecipePatch {
    /// `-Werror` becomes `-Wno-error`
    DowngradeWerror,
    /// `VAR=` (or `VAR =` when `spaced`) becomes `#VAR=`, so the compiler
    /// chosen by the environment wins over a hard-coded assignment
    CommentOutAssignment { var: String, spaced: bool },
    /// `SHARED` becomes `STATIC`
    SharedToStatic,
}

impl RecipePatch {
    pub fn comment_out(var: impl Into<String>, spaced: bool) -> Self {
        Self::CommentOutAssignment {
            var: var.into(),
            spaced,
        }
    }

    fn pattern(&self) -> String {
        match self {
            Self::DowngradeWerror => "-Werror".to_string(),
            Self::CommentOutAssignment { var, spaced: false } => format!("{}=", var),
            Self::CommentOutAssignment { var, spaced: true } => format!("{} =", var),
            Self::SharedToStatic => "SHARED".to_string(),
        }
    }

    fn replacement(&self) -> String {
        match self {
            Self::DowngradeWerror => "-Wno-error".to_string(),
            Self::CommentOutAssignment { var, .. } => format!("#{}=", var),
            Self::SharedToStatic => "STATIC".to_string(),
        }
    }

    /// Applies the substitution to descriptor text, every occurrence
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.pattern(), &self.replacement())
    }

    /// The equivalent `sed` expression. Patterns contain no sed metacharacters.
    pub fn sed_expression(&self) -> String {
        format!("s/{}/{}/g", self.pattern(), self.replacement())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildStep {
    /// A command line emitted verbatim
    Shell { command: String },

    /// `make [args...]`, optionally tolerating failure
    Make {
        args: Vec<String>,
        allow_failure: bool,
    },

    /// `export VAR="${VAR} <flag>"`
    AppendFlag { var: String, flag: String },

    CreateDir { path: String },

    ChangeDir { path: String },

    /// `cmake <defines...> <source_dir>`
    #[serde(rename = "cmake_configure")]
    CMakeConfigure {
        source_dir: String,
        defines: Vec<CMakeDefine>,
    },

    /// Compile each listed C file with `$CC $CFLAGS -c`
    CompileEach { files: Vec<PathBuf> },

    /// Compile every C file found below the current directory
    CompileFind { include_dirs: Vec<String> },

    /// Copy every object file found below the current directory into it
    CollectObjects,

    /// Drop `test*.o` from the current directory
    RemoveTestObjects,

    /// Archive `*.o` in the current directory into a static library
    Archive { archiver: String, library: String },

    /// Rewrite `file` in place
    Patch { file: String, patch: RecipePatch },
}

impl BuildStep {
    pub fn shell(command: impl Into<String>) -> Self {
        Self::Shell {
            command: command.into(),
        }
    }

    pub fn make<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Make {
            args: args.into_iter().map(Into::into).collect(),
            allow_failure: false,
        }
    }

    pub fn make_tolerant<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Make {
            args: args.into_iter().map(Into::into).collect(),
            allow_failure: true,
        }
    }

    pub fn patch(file: impl Into<String>, patch: RecipePatch) -> Self {
        Self::Patch {
            file: file.into(),
            patch,
        }
    }

    /// Renders the step as bash. Multi-line steps are joined with `\n`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell { command } => f.write_str(command),
            Self::Make {
                args,
                allow_failure,
            } => {
                f.write_str("make")?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                if *allow_failure {
                    f.write_str(" || true")?;
                }
                Ok(())
            }
            Self::AppendFlag { var, flag } => {
                write!(f, "export {var}=\"${{{var}}} {flag}\"", var = var, flag = flag)
            }
            Self::CreateDir { path } => write!(f, "mkdir {}", shell_word(path)),
            Self::ChangeDir { path } => write!(f, "cd {}", shell_word(path)),
            Self::CMakeConfigure {
                source_dir,
                defines,
            } => {
                f.write_str("cmake")?;
                for define in defines {
                    write!(f, " {}", define)?;
                }
                write!(f, " {}", source_dir)
            }
            Self::CompileEach { files } => {
                f.write_str("for file in")?;
                for file in files {
                    write!(f, " {}", shell_word(&file.to_string_lossy()))?;
                }
                f.write_str("; do\n  $CC $CFLAGS -c \"${file}\"\ndone")
            }
            Self::CompileFind { include_dirs } => {
                f.write_str("find . -name \"*.c\" -exec $CC $CFLAGS")?;
                for dir in include_dirs {
                    write!(f, " -I{}", dir)?;
                }
                f.write_str(" -c {} \\;")
            }
            Self::CollectObjects => f.write_str("find . -name \"*.o\" -exec cp {} . \\;"),
            Self::RemoveTestObjects => f.write_str("rm -f ./test*.o"),
            Self::Archive { archiver, library } => write!(f, "{} rcs {} *.o", archiver, library),
            Self::Patch { file, patch } => {
                write!(f, "sed -i '{}' {}", patch.sed_expression(), shell_word(file))
            }
        }
    }
}

/// Quotes `word` for bash when it contains anything outside a conservative
/// set of safe characters.
fn shell_word(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./+@%:,=".contains(c));
    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', "'\\''")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downgrade_werror() {
        let text = "CFLAGS = -O2 -Wall -Werror -Werror=format\n";
        assert_eq!(
            RecipePatch::DowngradeWerror.apply(text),
            "CFLAGS = -O2 -Wall -Wno-error -Wno-error=format\n"
        );
    }

    #[test]
    fn test_comment_out_compiler_assignments() {
        let text = "CC=gcc\nCXX = g++\nall:\n\t$(CC) -o app main.c\n";
        let patched = [
            RecipePatch::comment_out("CC", false),
            RecipePatch::comment_out("CXX", false),
            RecipePatch::comment_out("CC", true),
            RecipePatch::comment_out("CXX", true),
        ]
        .iter()
        .fold(text.to_string(), |acc, p| p.apply(&acc));

        assert_eq!(patched, "#CC=gcc\n#CXX= g++\nall:\n\t$(CC) -o app main.c\n");
    }

    #[test]
    fn test_shared_to_static() {
        let text = "add_library(foo SHARED foo.c)\n";
        assert_eq!(
            RecipePatch::SharedToStatic.apply(text),
            "add_library(foo STATIC foo.c)\n"
        );
    }

    #[test]
    fn test_patch_renders_as_sed() {
        let step = BuildStep::patch("./Makefile", RecipePatch::comment_out("CXX", true));
        assert_eq!(step.render(), "sed -i 's/CXX =/#CXX=/g' ./Makefile");
    }

    #[test]
    fn test_make_rendering() {
        assert_eq!(BuildStep::make(Vec::<String>::new()).render(), "make");
        assert_eq!(BuildStep::make(["test"]).render(), "make test");
        assert_eq!(BuildStep::make_tolerant(["V=1"]).render(), "make V=1 || true");
    }

    #[test]
    fn test_append_flag_rendering() {
        let step = BuildStep::AppendFlag {
            var: "CXXFLAGS".to_string(),
            flag: "-lpthread".to_string(),
        };
        assert_eq!(step.render(), "export CXXFLAGS=\"${CXXFLAGS} -lpthread\"");
    }

    #[test]
    fn test_cmake_configure_rendering() {
        let step = BuildStep::CMakeConfigure {
            source_dir: "../".to_string(),
            defines: vec![
                CMakeDefine::new("CMAKE_VERBOSE_MAKEFILE", "ON"),
                CMakeDefine::new("BUILD_SHARED_LIBS", "OFF"),
            ],
        };
        assert_eq!(
            step.render(),
            "cmake -DCMAKE_VERBOSE_MAKEFILE=ON -DBUILD_SHARED_LIBS=OFF ../"
        );
    }

    #[test]
    fn test_compile_each_quotes_unsafe_paths() {
        let step = BuildStep::CompileEach {
            files: vec![PathBuf::from("src/foo.c"), PathBuf::from("my dir/bar.c")],
        };
        assert_eq!(
            step.render(),
            "for file in src/foo.c 'my dir/bar.c'; do\n  $CC $CFLAGS -c \"${file}\"\ndone"
        );
    }

    #[test]
    fn test_find_based_rendering() {
        let compile = BuildStep::CompileFind {
            include_dirs: vec!["./src".to_string()],
        };
        assert_eq!(
            compile.render(),
            "find . -name \"*.c\" -exec $CC $CFLAGS -I./src -c {} \\;"
        );
        assert_eq!(
            BuildStep::Archive {
                archiver: "llvm-ar".to_string(),
                library: "libfuzz.a".to_string(),
            }
            .render(),
            "llvm-ar rcs libfuzz.a *.o"
        );
    }

    #[test]
    fn test_shell_word() {
        assert_eq!(shell_word("a/b.c"), "a/b.c");
        assert_eq!(shell_word("it's"), "'it'\\''s'");
        assert_eq!(shell_word(""), "''");
    }
}
