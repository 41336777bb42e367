//! Progress counter for copied files

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

use crate::pipeline::OnCopied;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> Arc<Mutex<Bar>> {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Force a refresh of the bar (e.g. so counter shows "0 files" immediately).
pub fn refresh_bar(pb: &Arc<Mutex<Bar>>) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Update progress bar if available.
/// Uses try_lock so the copy worker never blocks on the display.
pub fn update_progress_bar(pb: &Arc<Mutex<Bar>>, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Counter plus the callback the copy worker calls per copied file, when `enabled`.
pub fn copy_counter(enabled: bool) -> (Option<Arc<Mutex<Bar>>>, Option<OnCopied>) {
    if !enabled {
        return (None, None);
    }
    let bar = create_counter("Copying");
    refresh_bar(&bar);
    let for_worker = Arc::clone(&bar);
    let on_copied: OnCopied = Box::new(move |n| update_progress_bar(&for_worker, n));
    (Some(bar), Some(on_copied))
}

/// Final redraw and line break so log output starts on a fresh line.
pub fn finish_counter(bar: &Option<Arc<Mutex<Bar>>>) {
    if let Some(bar) = bar {
        if let Ok(mut b) = bar.lock() {
            let _ = b.refresh();
        }
        eprintln!();
    }
}
