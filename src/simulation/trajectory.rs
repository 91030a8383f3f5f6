//! Position history of a body
//!
//! - `Trajectory`    in-memory, append-only sequence read by the renderer
//! - `TrajectoryLog` durable per-body text log, one `x y z` line per tick

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::simulation::error::SimError;
use crate::simulation::states::NVec3;

/// Ordered positions, oldest first. There is no way to remove or reorder points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<NVec3>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn push(&mut self, point: NVec3) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[NVec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&NVec3> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&NVec3> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NVec3> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a NVec3;
    type IntoIter = std::slice::Iter<'a, NVec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Append-only on-disk log, one file per body id inside `dir`
#[derive(Debug, Clone)]
pub struct TrajectoryLog {
    dir: PathBuf,
}

impl TrajectoryLog {
    /// Use `dir` as the log directory, creating it if needed
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SimError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SimError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.txt"))
    }

    /// Append one `x y z` line to the log of body `id`
    pub fn append(&self, id: &str, point: &NVec3) -> Result<(), SimError> {
        let path = self.path_for(id);
        let io_err = |source| SimError::Io {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        writeln!(file, "{} {} {}", point.x, point.y, point.z).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kinematics-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn log_appends_one_line_per_point() {
        let dir = scratch_dir("append");
        let log = TrajectoryLog::create(&dir).unwrap();

        log.append("lander", &NVec3::new(1.0, 2.0, 3.0)).unwrap();
        log.append("lander", &NVec3::new(1.5, -2.0, 0.0)).unwrap();

        let text = fs::read_to_string(log.path_for("lander")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["1 2 3", "1.5 -2 0"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn log_reports_io_failure() {
        let dir = scratch_dir("missing");
        let log = TrajectoryLog::create(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let err = log.append("lander", &NVec3::zeros()).unwrap_err();
        assert!(matches!(err, SimError::Io { .. }));
    }

    #[test]
    fn trajectory_keeps_order() {
        let mut t = Trajectory::new();
        t.push(NVec3::new(0.0, 0.0, 0.0));
        t.push(NVec3::new(1.0, 0.0, 0.0));
        assert_eq!(t.len(), 2);
        assert_eq!(t.first(), Some(&NVec3::zeros()));
        assert_eq!(t.last(), Some(&NVec3::new(1.0, 0.0, 0.0)));
    }
}
