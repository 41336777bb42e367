/// Check if filesystem type indicates network storage
#[inline]
pub(crate) fn is_network_fs(fs_type: &str) -> bool {
    let fs = fs_type.to_lowercase();
    fs.contains("nfs")
        || fs.contains("smb")
        || fs.contains("cifs")
        || fs.contains("afp")
        || fs.contains("webdav")
        || fs.contains("sshfs")
}

/// Check if filesystem type is memory-backed or synthetic (nothing worth sweeping)
#[inline]
pub(crate) fn is_virtual_fs(fs_type: &str) -> bool {
    matches!(
        fs_type.to_lowercase().as_str(),
        "tmpfs"
            | "devtmpfs"
            | "ramfs"
            | "proc"
            | "sysfs"
            | "overlay"
            | "squashfs"
            | "devfs"
            | "autofs"
            | "efivarfs"
    )
}

/// Check if mount point indicates network path
#[inline]
pub(crate) fn is_network_mount(mount: &str) -> bool {
    mount.starts_with("\\\\") || mount.starts_with("//")
}
