use std::path::PathBuf;
use volsweep::engine::{glob_match, is_skipped_dir, path_relative_to};
use volsweep::utils::{OptsDraft, is_host_ignored};
use volsweep::volumes::{select_sweep_targets, volume_for_path};
use volsweep::{PatternSet, VolumeKind, VolumeRoot};

// --- path_relative_to ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/media/usb");
    let path = PathBuf::from("/media/usb/DCIM/100/IMG_0001.JPG");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("DCIM/100/IMG_0001.JPG"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/media/usb");
    let path = PathBuf::from("/media/usb2/a.jpg");
    assert_eq!(path_relative_to(&path, &base), None);
}

// --- glob_match ---

#[test]
fn test_glob_star_matches_extension() {
    assert!(glob_match("*.jpg", "holiday.jpg"));
    assert!(glob_match("*.jpg", ".jpg"));
    assert!(!glob_match("*.jpg", "holiday.jpeg"));
    assert!(!glob_match("*.jpg", "holiday.jpg.txt"));
}

#[test]
fn test_glob_is_case_insensitive() {
    assert!(glob_match("*.jpg", "IMG_0001.JPG"));
    assert!(glob_match("img_*", "IMG_0001.JPG"));
}

#[test]
fn test_glob_question_mark_is_one_char() {
    assert!(glob_match("IMG_????.png", "IMG_0042.png"));
    assert!(!glob_match("IMG_????.png", "IMG_042.png"));
    assert!(!glob_match("IMG_????.png", "IMG_00042.png"));
}

#[test]
fn test_glob_multiple_stars_backtrack() {
    assert!(glob_match("*a*b*", "xxaxxbxx"));
    assert!(glob_match("*.tar.*", "backup.tar.gz"));
    assert!(!glob_match("*a*b", "xxbxxa"));
}

#[test]
fn test_glob_literal_and_empty() {
    assert!(glob_match("report.pdf", "Report.PDF"));
    assert!(glob_match("*", ""));
    assert!(!glob_match("", "a"));
}

// --- PatternSet ---

#[test]
fn test_pattern_set_parse_drops_empty_entries() {
    let set = PatternSet::parse(" *.jpg ;;*.png; ", ';');
    assert_eq!(set.iter().collect::<Vec<_>>(), vec!["*.jpg", "*.png"]);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_pattern_set_matches_any() {
    let set = PatternSet::new(["*.jpg", "*.png"]);
    assert!(set.matches("a.PNG"));
    assert!(!set.matches("a.gif"));
    assert!(!PatternSet::default().matches("a.jpg"));
}

// --- VolumeRoot ---

#[test]
fn test_volume_id() {
    assert_eq!(VolumeRoot::new("D:\\", VolumeKind::Removable).id(), "D");
    assert_eq!(VolumeRoot::new("e:", VolumeKind::Fixed).id(), "E");
    assert_eq!(VolumeRoot::new("/", VolumeKind::Fixed).id(), "root");
    assert_eq!(
        VolumeRoot::new("/media/usb/", VolumeKind::Removable).id(),
        "media_usb"
    );
}

#[test]
fn test_volume_id_keeps_folder_under_drive() {
    let photos = VolumeRoot::new("D:\\Photos", VolumeKind::Fixed);
    let music = VolumeRoot::new("D:\\Music\\", VolumeKind::Fixed);
    assert_eq!(photos.id(), "D_Photos");
    assert_eq!(music.id(), "D_Music");
    assert_eq!(VolumeRoot::new("d:/Photos/2024", VolumeKind::Fixed).id(), "D_Photos_2024");
}

#[test]
fn test_only_fixed_and_removable_are_sweepable() {
    assert!(VolumeRoot::new("/", VolumeKind::Fixed).is_sweepable());
    assert!(VolumeRoot::new("/media/usb", VolumeKind::Removable).is_sweepable());
    assert!(!VolumeRoot::new("/mnt/nas", VolumeKind::Other).is_sweepable());
}

#[test]
fn test_targets_without_own_volume_keep_all_sweepable() {
    let v = vec![
        VolumeRoot::new("/", VolumeKind::Fixed),
        VolumeRoot::new("/media/usb", VolumeKind::Removable),
        VolumeRoot::new("/proc", VolumeKind::Other),
    ];
    assert_eq!(select_sweep_targets(&v, None).len(), 2);
}

#[test]
fn test_targets_from_cwd_volume() {
    let v = vec![
        VolumeRoot::new("/", VolumeKind::Fixed),
        VolumeRoot::new("/media/usb", VolumeKind::Removable),
    ];
    let own = volume_for_path(&PathBuf::from("/media/usb/tools"), &v).cloned();
    let targets = select_sweep_targets(&v, own.as_ref());
    assert_eq!(targets, vec![VolumeRoot::new("/", VolumeKind::Fixed)]);
}

// --- is_skipped_dir ---

#[test]
fn test_skipped_dir_ignores_trailing_separator() {
    let skip = vec![PathBuf::from("/media/usb/")];
    assert!(is_skipped_dir(&PathBuf::from("/media/usb"), &skip));
    assert!(!is_skipped_dir(&PathBuf::from("/media/usb/DCIM"), &skip));
}

// --- host exclusion ---

#[test]
fn test_host_exclusion_is_exact_but_case_insensitive() {
    let ignored = vec!["OFFICE-PC".to_string(), "laptop".to_string()];
    assert!(is_host_ignored("office-pc", &ignored));
    assert!(is_host_ignored("LAPTOP", &ignored));
    assert!(!is_host_ignored("OFFICE", &ignored));
}

// --- settings validation ---

#[test]
fn test_draft_requires_min_size_and_patterns() {
    assert!(OptsDraft::default().build().is_err());

    let draft = OptsDraft {
        min_size: Some(1024),
        ..Default::default()
    };
    assert!(draft.build().is_err());

    let draft = OptsDraft {
        min_size: Some(1024),
        patterns: Some(PatternSet::parse("*.jpg", ';')),
        ..Default::default()
    };
    let opts = draft.build().unwrap();
    assert_eq!(opts.min_size, 1024);
    assert!(opts.ignored_hosts.is_empty());
}
