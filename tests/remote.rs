#[allow(dead_code)]
mod common;

use color_eyre::Result;
use common::{MockTransport, enter_remote};
use crossterm::event::KeyCode;

#[tokio::test(start_paused = true)]
async fn empty_search_shows_nothing() -> Result<()> {
    let transport = MockTransport::default();
    let mut h = enter_remote(&transport, false)?;
    h.wait(500).await?;
    assert!(h.controller().is_open());
    assert!(h.catalog().is_empty());
    assert!(transport.queries().is_empty());
    insta::assert_snapshot!(h.screen()?, @"> Type to search...");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn keystrokes_within_quiet_period_fetch_once() -> Result<()> {
    let transport = MockTransport::default();
    let mut h = enter_remote(&transport, false)?;
    h.type_str("ab")?;
    h.wait(30).await?;
    h.type_str("c")?;
    insta::assert_snapshot!(h.screen()?, @r"
    > abc
      Loading...
    ");

    h.wait(250).await?;
    assert_eq!(transport.queries(), ["abc"]);
    assert_eq!(h.catalog(), ["abc-1", "abc-2"]);
    insta::assert_snapshot!(h.screen()?, @r"
    > abc
    > abc one
      abc two
    ");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn late_result_of_older_query_is_discarded() -> Result<()> {
    let transport = MockTransport::default().with_delay("x", 300).with_delay("y", 50);
    let mut h = enter_remote(&transport, false)?;
    h.type_str("x")?;
    h.wait(210).await?;
    assert_eq!(transport.queries(), ["x"]);

    h.key(KeyCode::Backspace)?;
    h.type_str("y")?;
    h.wait(210).await?;
    assert_eq!(transport.queries(), ["x", "y"]);
    h.wait(60).await?;
    assert_eq!(h.catalog(), ["y-1", "y-2"]);

    // "x" completes now, after "y"
    h.wait(200).await?;
    assert_eq!(h.catalog(), ["y-1", "y-2"]);
    assert!(!h.controller().is_loading());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_query_shows_empty_list() -> Result<()> {
    let transport = MockTransport::default();
    let mut h = enter_remote(&transport, false)?;
    h.type_str("fail")?;
    h.wait(250).await?;
    assert_eq!(transport.queries(), ["fail"]);
    assert!(h.controller().is_open());
    assert!(!h.controller().is_loading());
    assert!(h.catalog().is_empty());
    insta::assert_snapshot!(h.screen()?, @"> fail");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn closing_orphans_the_pending_query() -> Result<()> {
    let transport = MockTransport::default().with_delay("ab", 100);
    let mut h = enter_remote(&transport, false)?;
    h.type_str("ab")?;
    h.wait(210).await?;
    h.key(KeyCode::Esc)?;
    h.wait(200).await?;
    assert!(!h.controller().is_open());
    assert!(h.catalog().is_empty());

    // reopening queries right away
    h.click(2, 0)?;
    assert!(h.controller().is_loading());
    h.wait(150).await?;
    assert_eq!(transport.queries(), ["ab", "ab"]);
    assert_eq!(h.catalog(), ["ab-1", "ab-2"]);
    assert_eq!(h.controller().highlight(), Some(0));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn remote_pills_remain_removable() -> Result<()> {
    let transport = MockTransport::default();
    let mut h = enter_remote(&transport, true)?;
    h.type_str("jo")?;
    h.wait(250).await?;
    h.key(KeyCode::Enter)?;
    h.settle().await?;

    assert_eq!(h.controller().submission_value(), "jo-1");
    assert!(h.catalog().is_empty());
    insta::assert_snapshot!(h.screen()?, @r"
     jo one ×
    > Type to search...
    ");

    // " jo one " is 8 wide
    h.click(8, 0)?;
    assert!(h.controller().selection().is_empty());
    assert_eq!(transport.queries(), ["jo"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn selection_survives_new_queries() -> Result<()> {
    let transport = MockTransport::default();
    let mut h = enter_remote(&transport, true)?;
    h.type_str("jo")?;
    h.wait(250).await?;
    h.key(KeyCode::Down)?;
    h.key(KeyCode::Enter)?;
    h.type_str("jo")?;
    h.wait(250).await?;

    insta::assert_snapshot!(h.screen()?, @r"
     jo two ×
    > jo
    > [ ] jo one
      [x] jo two
    ");
    Ok(())
}
