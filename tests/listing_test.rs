//! Integration tests for keyset listing.

mod common;

use assert_matches::assert_matches;
use common::TestHarness;
use mediavault::config::Config;
use mediavault::listing::PageInit;
use mediavault::{Error, ObjectId};
use mediavault_db::models::{ObjectFilter, StoredObject};

fn seed(h: &TestHarness, count: usize) -> Vec<StoredObject> {
    (1..=count)
        .map(|i| h.put(&format!("file{i:02}.txt"), b"x"))
        .collect()
}

fn ids(items: &[StoredObject]) -> Vec<i64> {
    items.iter().map(|o| o.id.get()).collect()
}

#[test]
fn test_walks_all_pages_newest_first() {
    let h = TestHarness::new();
    seed(&h, 7);
    let filter = ObjectFilter::all();

    let init = h.vault.listing.init_page(&filter).unwrap();
    assert_eq!(init.item_count, 7);
    assert_eq!(init.initial_cursor, Some(ObjectId::new(7)));

    let page = h
        .vault
        .listing
        .get_page(&filter, init.initial_cursor, Some(3))
        .unwrap();
    assert_eq!(ids(&page.items), vec![7, 6, 5]);
    assert_eq!(page.next_cursor, Some(ObjectId::new(4)));

    let page = h
        .vault
        .listing
        .get_page(&filter, page.next_cursor, Some(3))
        .unwrap();
    assert_eq!(ids(&page.items), vec![4, 3, 2]);
    assert_eq!(page.next_cursor, Some(ObjectId::new(1)));

    let page = h
        .vault
        .listing
        .get_page(&filter, page.next_cursor, Some(3))
        .unwrap();
    assert_eq!(ids(&page.items), vec![1]);
    assert_eq!(page.next_cursor, None);
}

#[test]
fn test_exact_multiple_has_no_trailing_cursor() {
    let h = TestHarness::new();
    seed(&h, 6);
    let filter = ObjectFilter::all();

    let first = h.vault.listing.get_page(&filter, None, Some(3)).unwrap();
    assert_eq!(first.next_cursor, Some(ObjectId::new(3)));

    let second = h
        .vault
        .listing
        .get_page(&filter, first.next_cursor, Some(3))
        .unwrap();
    assert_eq!(ids(&second.items), vec![3, 2, 1]);
    assert_eq!(second.next_cursor, None);
}

#[test]
fn test_listing_is_stable_across_new_ingestions() {
    let h = TestHarness::new();
    seed(&h, 4);
    let filter = ObjectFilter::all();

    let init = h.vault.listing.init_page(&filter).unwrap();
    h.put("late-arrival.txt", b"y");

    let mut seen = Vec::new();
    let mut cursor = init.initial_cursor;
    while let Some(c) = cursor {
        let page = h.vault.listing.get_page(&filter, Some(c), Some(2)).unwrap();
        seen.extend(ids(&page.items));
        cursor = page.next_cursor;
    }

    assert_eq!(seen, vec![4, 3, 2, 1]);
    assert_eq!(seen.len() as u64, init.item_count);
}

#[test]
fn test_empty_listing() {
    let h = TestHarness::new();
    let init = h.vault.listing.init_page(&ObjectFilter::all()).unwrap();
    assert_eq!(
        init,
        PageInit {
            item_count: 0,
            initial_cursor: None
        }
    );
}

#[test]
fn test_gallery_filter_keeps_images_and_videos() {
    let h = TestHarness::new();
    h.put("a.png", b"img");
    h.put("b.txt", b"text");
    h.put("c.mp4", b"vid");
    h.put("d.pdf", b"doc");
    h.put("e.jpg", b"img");

    let filter = ObjectFilter::all().gallery();
    let init = h.vault.listing.init_page(&filter).unwrap();
    assert_eq!(init.item_count, 3);
    assert_eq!(init.initial_cursor, Some(ObjectId::new(5)));

    let page = h.vault.listing.get_page(&filter, None, None).unwrap();
    let names: Vec<&str> = page.items.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["e.jpg", "c.mp4", "a.png"]);
}

#[test]
fn test_mime_and_name_filters_combine() {
    let h = TestHarness::new();
    h.put("holiday-1.png", b"1");
    h.put("holiday-2.jpg", b"2");
    h.put("work.png", b"3");
    h.put("holiday-3.png", b"4");

    let filter = ObjectFilter::all().with_name("HOLIDAY").with_mime("png");
    let init = h.vault.listing.init_page(&filter).unwrap();
    assert_eq!(init.item_count, 2);
    assert_eq!(init.initial_cursor, Some(ObjectId::new(4)));

    let page = h.vault.listing.get_page(&filter, init.initial_cursor, None).unwrap();
    assert_eq!(ids(&page.items), vec![4, 1]);
    assert!(page.items.iter().all(|o| filter.matches(o)));
}

#[test]
fn test_filtered_next_cursor_points_at_next_match() {
    let h = TestHarness::new();
    h.put("a.png", b"1");
    h.put("b.txt", b"2");
    h.put("c.png", b"3");
    h.put("d.txt", b"4");
    h.put("e.png", b"5");

    let filter = ObjectFilter::all().with_mime("image");
    let page = h.vault.listing.get_page(&filter, None, Some(1)).unwrap();
    assert_eq!(ids(&page.items), vec![5]);
    assert_eq!(page.next_cursor, Some(ObjectId::new(3)));
}

#[test]
fn test_page_limits() {
    let mut config = Config::default();
    config.listing.default_limit = 2;
    config.listing.max_limit = 4;
    let h = TestHarness::with_config(config);
    seed(&h, 6);
    let filter = ObjectFilter::all();

    let page = h.vault.listing.get_page(&filter, None, None).unwrap();
    assert_eq!(page.items.len(), 2);

    let page = h.vault.listing.get_page(&filter, None, Some(100)).unwrap();
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.next_cursor, Some(ObjectId::new(2)));

    assert_matches!(
        h.vault.listing.get_page(&filter, None, Some(0)),
        Err(Error::InvalidInput(_))
    );
}

#[test]
fn test_deleted_objects_drop_out_of_later_pages() {
    let h = TestHarness::new();
    let objects = seed(&h, 5);
    let filter = ObjectFilter::all();

    let first = h.vault.listing.get_page(&filter, None, Some(2)).unwrap();
    assert_eq!(first.next_cursor, Some(ObjectId::new(3)));

    h.vault.library.delete(objects[2].id).unwrap();

    let second = h
        .vault
        .listing
        .get_page(&filter, first.next_cursor, Some(2))
        .unwrap();
    assert_eq!(ids(&second.items), vec![2, 1]);
    assert_eq!(second.next_cursor, None);
}

#[test]
fn test_pages_carry_tags() {
    let h = TestHarness::new();
    let object = h.put("tagged.png", b"1");
    h.vault
        .library
        .update_details(
            object.id,
            "tagged.png",
            "",
            &["sunset".to_string(), "beach".to_string()],
        )
        .unwrap();

    let page = h
        .vault
        .listing
        .get_page(&ObjectFilter::all(), None, None)
        .unwrap();
    assert_eq!(page.items[0].tags, vec!["sunset", "beach"]);
}
