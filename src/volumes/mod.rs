//! Volume enumeration and selection.
//!
//! [`SystemVolumes`] lists attached volumes through `sysinfo`; [`StaticVolumes`] is a fixed list
//! for explicit `--root` sweeps and tests. [`select_sweep_targets`] applies the kind filter and
//! drops the volume the process runs from.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};
use sysinfo::{Disk, Disks};

use crate::types::{normalized_path, roots_equal};
use crate::{VolumeKind, VolumeRoot};

mod filesystems;

use filesystems::{is_network_fs, is_network_mount, is_virtual_fs};

/// Source of the volume list for one run.
pub trait VolumeSource: Send + Sync {
    fn volumes(&self) -> Result<Vec<VolumeRoot>>;
}

/// Attached volumes as reported by the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemVolumes;

impl VolumeSource for SystemVolumes {
    fn volumes(&self) -> Result<Vec<VolumeRoot>> {
        let disks = Disks::new_with_refreshed_list();

        debug!("Available disks:");
        let mut volumes: Vec<VolumeRoot> = Vec::new();
        for d in disks.iter() {
            let volume = VolumeRoot::new(d.mount_point(), classify(d));
            debug!(
                "  mount={}, fs={}, removable={}, kind={:?}",
                d.mount_point().display(),
                d.file_system().to_string_lossy(),
                d.is_removable(),
                volume.kind
            );
            // sysinfo can report the same mount twice (bind mounts, btrfs subvolumes)
            if !volumes.iter().any(|v| v.same_root(&volume)) {
                volumes.push(volume);
            }
        }
        Ok(volumes)
    }
}

fn classify(disk: &Disk) -> VolumeKind {
    let fs_type = disk.file_system().to_string_lossy();
    let mount = disk.mount_point().to_string_lossy();
    if is_network_fs(&fs_type) || is_network_mount(&mount) || is_virtual_fs(&fs_type) {
        VolumeKind::Other
    } else if disk.is_removable() {
        VolumeKind::Removable
    } else {
        VolumeKind::Fixed
    }
}

/// A fixed volume list.
#[derive(Debug, Default, Clone)]
pub struct StaticVolumes(pub Vec<VolumeRoot>);

impl StaticVolumes {
    /// Treat each directory as a fixed volume of its own.
    pub fn from_roots(roots: &[PathBuf]) -> Self {
        Self(
            roots
                .iter()
                .map(|r| VolumeRoot::new(r.clone(), VolumeKind::Fixed))
                .collect(),
        )
    }
}

impl VolumeSource for StaticVolumes {
    fn volumes(&self) -> Result<Vec<VolumeRoot>> {
        Ok(self.0.clone())
    }
}

/// The volume containing `path`: longest root that prefixes it (case-insensitive and either
/// slash on Windows).
pub fn volume_for_path<'a>(path: &Path, volumes: &'a [VolumeRoot]) -> Option<&'a VolumeRoot> {
    let path_str = normalized_path(path);
    volumes
        .iter()
        .filter(|v| {
            let root = normalized_path(&v.root);
            let root = root.trim_end_matches('/');
            path_str == root
                || path_str
                    .strip_prefix(root)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|v| v.root.as_os_str().len())
}

/// Fixed and removable volumes, minus `own` (the volume of the working directory).
pub fn select_sweep_targets(volumes: &[VolumeRoot], own: Option<&VolumeRoot>) -> Vec<VolumeRoot> {
    volumes
        .iter()
        .filter(|v| v.is_sweepable())
        .filter(|v| own.is_none_or(|o| !v.same_root(o)))
        .cloned()
        .collect()
}

/// Directories a walk of `target` must not enter: every other volume's root (nested mounts)
/// plus `extra` (the staging root).
pub fn skip_dirs_for(
    target: &VolumeRoot,
    volumes: &[VolumeRoot],
    extra: &[PathBuf],
) -> Vec<PathBuf> {
    volumes
        .iter()
        .filter(|v| !roots_equal(&v.root, &target.root))
        .map(|v| v.root.clone())
        .chain(extra.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vols() -> Vec<VolumeRoot> {
        vec![
            VolumeRoot::new("/", VolumeKind::Fixed),
            VolumeRoot::new("/home", VolumeKind::Fixed),
            VolumeRoot::new("/media/usb", VolumeKind::Removable),
            VolumeRoot::new("/mnt/nas", VolumeKind::Other),
        ]
    }

    #[test]
    fn test_volume_for_path_longest_prefix() {
        let v = vols();
        assert_eq!(
            volume_for_path(Path::new("/home/user/x"), &v).unwrap().root,
            PathBuf::from("/home")
        );
        assert_eq!(
            volume_for_path(Path::new("/homework"), &v).unwrap().root,
            PathBuf::from("/")
        );
        assert_eq!(
            volume_for_path(Path::new("/media/usb"), &v).unwrap().root,
            PathBuf::from("/media/usb")
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_volume_for_windows_path_is_case_insensitive() {
        let v = vec![
            VolumeRoot::new("C:\\", VolumeKind::Fixed),
            VolumeRoot::new("D:\\", VolumeKind::Removable),
        ];
        assert_eq!(
            volume_for_path(Path::new("d:\\Photos\\a.jpg"), &v).unwrap().id(),
            "D"
        );
    }

    #[test]
    fn test_select_targets_drops_own_and_other_kinds() {
        let v = vols();
        let own = v[1].clone();
        let targets = select_sweep_targets(&v, Some(&own));
        let roots: Vec<_> = targets.iter().map(|t| t.root.clone()).collect();
        assert_eq!(roots, vec![PathBuf::from("/"), PathBuf::from("/media/usb")]);
    }

    #[cfg(windows)]
    #[test]
    fn test_select_targets_own_comparison_ignores_case() {
        let v = vec![
            VolumeRoot::new("C:\\", VolumeKind::Fixed),
            VolumeRoot::new("E:\\", VolumeKind::Removable),
        ];
        let own = VolumeRoot::new("c:\\", VolumeKind::Fixed);
        let targets = select_sweep_targets(&v, Some(&own));
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id(), "E");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_select_targets_own_comparison_is_case_sensitive() {
        let v = vec![
            VolumeRoot::new("/mnt/usb", VolumeKind::Fixed),
            VolumeRoot::new("/mnt/USB", VolumeKind::Removable),
        ];
        let own = volume_for_path(Path::new("/mnt/usb/tools"), &v).cloned();
        assert_eq!(own.as_ref().map(|o| o.root.clone()), Some(PathBuf::from("/mnt/usb")));
        let targets = select_sweep_targets(&v, own.as_ref());
        assert_eq!(targets, vec![VolumeRoot::new("/mnt/USB", VolumeKind::Removable)]);
    }

    #[test]
    fn test_skip_dirs_excludes_self() {
        let v = vols();
        let skip = skip_dirs_for(&v[0], &v, &[PathBuf::from("/home/.2024_01_01_00_00_00")]);
        assert!(!skip.contains(&PathBuf::from("/")));
        assert!(skip.contains(&PathBuf::from("/home")));
        assert!(skip.contains(&PathBuf::from("/home/.2024_01_01_00_00_00")));
    }
}
