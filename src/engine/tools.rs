//! Path and filter utilities

use std::path::{Path, PathBuf};

use crate::types::roots_equal;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// True if `dir` is one of the subtrees the walk must not enter (other volume roots, the
/// staging root).
pub fn is_skipped_dir(dir: &Path, skip_dirs: &[PathBuf]) -> bool {
    skip_dirs.iter().any(|s| roots_equal(dir, s))
}

/// Glob match of a file name against a pattern (`*` any run, `?` one char).
///
/// ASCII case-insensitive: `*.jpg` matches `IMG_0001.JPG`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let eq = |a: char, b: char| a.eq_ignore_ascii_case(&b);

    let (mut pi, mut ti) = (0, 0);
    // Position of the last '*' and the text index it is currently absorbing up to.
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        match p.get(pi) {
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some('?') => {
                pi += 1;
                ti += 1;
            }
            Some(&c) if eq(c, t[ti]) => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    pi = sp + 1;
                    ti = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}
