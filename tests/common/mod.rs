#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rainstack::{Height, Water};

/// Golden text file under `tests/snapshots/`
pub struct Golden {
    path: PathBuf,
}

impl Golden {
    pub fn named(name: &str) -> Self {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/snapshots")
            .join(name);
        Self { path }
    }

    /// Rewrite the golden file when `RAINSTACK_BLESS` is set.
    fn bless(&self, rendered: &str) -> bool {
        if std::env::var_os("RAINSTACK_BLESS").is_none() {
            return false;
        }
        fs::write(&self.path, rendered)
            .unwrap_or_else(|err| panic!("cannot bless {}: {err}", self.path.display()));
        true
    }

    /// Compare line by line, reporting the first line that differs.
    pub fn check(&self, rendered: &str) {
        if self.bless(rendered) {
            return;
        }
        let stored = fs::read_to_string(&self.path).unwrap_or_else(|err| {
            panic!(
                "missing golden file {} ({err}); rerun with RAINSTACK_BLESS=1",
                self.path.display()
            )
        });

        let mut want = stored.lines();
        let mut got = rendered.lines();
        for line_no in 1.. {
            match (want.next(), got.next()) {
                (None, None) => return,
                (want_line, got_line) if want_line == got_line => {}
                (want_line, got_line) => panic!(
                    "{} line {line_no}: expected {want_line:?}, rendered {got_line:?}",
                    self.path.display()
                ),
            }
        }
    }
}

/// Quadratic brute force: for each bar, scan both sides for the tallest wall.
pub fn brute_force_total(heights: &[Height]) -> Water {
    (0..heights.len())
        .map(|i| {
            let left = heights[..=i].iter().copied().max().unwrap_or(0);
            let right = heights[i..].iter().copied().max().unwrap_or(0);
            Water::from(left.min(right) - heights[i])
        })
        .sum()
}

/// Profiles with well-known answers.
pub fn known_profiles() -> Vec<(Vec<Height>, Water)> {
    vec![
        (vec![], 0),
        (vec![4, 2, 0, 3, 2, 5], 9),
        (vec![1, 1, 1], 0),
        (vec![5, 4, 3, 2, 1], 0),
        (vec![3, 0, 0, 2, 0, 4], 10),
        (vec![0, 1, 0, 2, 1, 0, 1, 3, 2, 1, 2, 1], 6),
    ]
}
