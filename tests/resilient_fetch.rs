// tests/resilient_fetch.rs
//! Retrying and pagination through `ResilientRepository`.

mod common;

use common::*;
use notion2pandoc::{AppError, Block, ErrorClass, NotionErrorCode, PageId};
use pretty_assertions::assert_eq;

fn numbered_paragraphs(count: u32) -> Vec<Block> {
    (1..=count)
        .map(|n| paragraph(n, &format!("p{}", n)))
        .collect()
}

fn texts(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .map(|block| {
            block
                .rich_text()
                .map(notion2pandoc::types::plain_content)
                .unwrap_or_default()
        })
        .collect()
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let page: PageId = id(1);
    let fake = FakeRepository::new()
        .with_page(&page, "Retry", numbered_paragraphs(2))
        .fail(
            &format!("children:{}", page),
            &[Scripted::RateLimited, Scripted::Unavailable],
        );

    let blocks = fake
        .resilient(fast_policy(3), 100)
        .all_children(&page.retag())
        .await
        .expect("third attempt succeeds");

    assert_eq!(texts(&blocks), vec!["p1", "p2"]);
    assert_eq!(fake.calls(&format!("children:{}", page)), 3);
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    let page: PageId = id(2);
    let fake = FakeRepository::new()
        .with_page(&page, "Forbidden", Vec::new())
        .fail(&format!("page:{}", page), &[Scripted::Unauthorized]);

    let error = fake
        .resilient(fast_policy(3), 100)
        .page(&page)
        .await
        .expect_err("unauthorized is permanent");

    assert_eq!(fake.calls(&format!("page:{}", page)), 1);
    assert_eq!(error.class(), ErrorClass::Permanent);
    assert!(matches!(
        error,
        AppError::NotionService {
            code: NotionErrorCode::Unauthorized,
            status: 401,
            ..
        }
    ));
}

#[tokio::test]
async fn exhaustion_reports_attempts_and_keeps_the_last_error() {
    let page: PageId = id(3);
    let fake = FakeRepository::new()
        .with_page(&page, "Down", Vec::new())
        .fail(&format!("page:{}", page), &[Scripted::Unavailable; 4]);

    let error = fake
        .resilient(fast_policy(3), 100)
        .page(&page)
        .await
        .expect_err("four failures exhaust three retries");

    assert_eq!(fake.calls(&format!("page:{}", page)), 4);
    match &error {
        AppError::RetriesExhausted {
            context, attempts, ..
        } => {
            assert_eq!(*attempts, 4);
            assert!(context.starts_with("retrieve page 00000000"));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(error.class(), ErrorClass::Unavailable);
    assert!(matches!(
        error.root(),
        AppError::NotionService { status: 503, .. }
    ));
}

#[tokio::test]
async fn zero_retries_means_a_single_attempt() {
    let page: PageId = id(4);
    let fake = FakeRepository::new()
        .with_page(&page, "Once", Vec::new())
        .fail(&format!("page:{}", page), &[Scripted::RateLimited]);

    let result = fake.resilient(fast_policy(0), 100).page(&page).await;

    assert!(matches!(result, Err(AppError::RetriesExhausted { attempts: 1, .. })));
    assert_eq!(fake.calls(&format!("page:{}", page)), 1);
}

#[tokio::test]
async fn pagination_drains_every_cursor_in_order() {
    let page: PageId = id(5);
    let fake = FakeRepository::new().with_page(&page, "Long", numbered_paragraphs(250));

    let blocks = fake
        .resilient(fast_policy(0), 100)
        .all_children(&page.retag())
        .await
        .expect("listing succeeds");

    assert_eq!(blocks.len(), 250);
    assert_eq!(texts(&blocks[..2]), vec!["p1", "p2"]);
    assert_eq!(texts(&blocks[249..]), vec!["p250"]);
    assert_eq!(fake.calls(&format!("children:{}", page)), 3);
    assert_eq!(fake.page_sizes(), vec![100, 100, 100]);
}

#[tokio::test]
async fn page_size_zero_and_oversized_use_the_api_maximum() {
    let page: PageId = id(6);
    let fake = FakeRepository::new().with_page(&page, "Sizes", numbered_paragraphs(120));

    let from_zero = fake
        .resilient(fast_policy(0), 0)
        .all_children(&page.retag())
        .await
        .expect("listing succeeds");
    let from_large = fake
        .resilient(fast_policy(0), 500)
        .all_children(&page.retag())
        .await
        .expect("listing succeeds");

    assert_eq!(from_zero.len(), 120);
    assert_eq!(from_large.len(), 120);
    assert_eq!(fake.page_sizes(), vec![100, 100, 100, 100]);
}

#[tokio::test]
async fn a_failing_second_page_is_retried_in_place() {
    let page: PageId = id(7);
    let key = format!("children:{}", page);
    let fake = FakeRepository::new()
        .with_page(&page, "Flaky", numbered_paragraphs(15));

    let repository = fake.resilient(fast_policy(2), 10);
    let first = repository
        .children_page(&page.retag(), notion2pandoc::PageRequest::first(10))
        .await
        .expect("first page");
    let fake = fake.fail(&key, &[Scripted::Unavailable]);
    let cursor = first.next_cursor.clone().expect("more rows remain");
    let second = repository
        .children_page(
            &page.retag(),
            notion2pandoc::PageRequest::first(10).after(cursor),
        )
        .await
        .expect("retried second page");

    assert_eq!(first.results.len(), 10);
    assert_eq!(second.results.len(), 5);
    assert!(!second.has_more);
    assert_eq!(fake.calls(&key), 3);
}

#[tokio::test]
async fn data_source_rows_are_collected() {
    let database = id(8);
    let fake = FakeRepository::new().with_database(&database, "Tasks", &["One", "Two", "Three"]);

    let repository = fake.resilient(fast_policy(0), 2);
    let info = repository.database(&database).await.expect("database");
    let rows = repository
        .all_rows(&info.data_sources[0].id)
        .await
        .expect("rows");

    assert_eq!(info.title, "Tasks");
    assert_eq!(
        rows.iter().map(|row| row.title.as_str()).collect::<Vec<_>>(),
        vec!["One", "Two", "Three"]
    );
    assert_eq!(fake.calls(&format!("rows:{}", info.data_sources[0].id)), 2);
}
