//! Host-name exclusion: the sweep never starts on a host listed in `ignored_computers`.

/// Name of the running machine, if the OS reports one.
pub fn current_host_name() -> Option<String> {
    sysinfo::System::host_name()
}

/// True if `host` appears in `ignored` (case-insensitive; machine names are on Windows).
pub fn is_host_ignored(host: &str, ignored: &[String]) -> bool {
    let host = host.trim();
    !host.is_empty() && ignored.iter().any(|h| h.trim().eq_ignore_ascii_case(host))
}
