//! CRUD behavior of the peripheral stores: baby/feeding records, chat
//! sessions, pregnancy info and user settings.

use chrono::{NaiveDate, NaiveTime};
use tempfile::TempDir;

use cradle::{
    append_message, new_message, new_session, AiConfig, AiProvider, BabyRecord, ChatRole,
    ChatStore, FeedingRecord, FeedingSide, FeedingType, PregnancyTracker, RecordStore, Settings,
    Store,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn baby_record(id: &str, on: NaiveDate, weight: f64) -> BabyRecord {
    BabyRecord {
        id: id.to_string(),
        date: on,
        weight: Some(weight),
        height: None,
        head_circumference: None,
        notes: None,
    }
}

fn feeding_record(id: &str, on: NaiveDate, at: NaiveTime) -> FeedingRecord {
    FeedingRecord {
        id: id.to_string(),
        date: on,
        time: at,
        feeding_type: FeedingType::Breastfeed,
        duration: Some(15),
        amount: None,
        side: Some(FeedingSide::Left),
        notes: None,
    }
}

fn open_store(dir: &TempDir) -> Store {
    Store::open(dir.path().join("records.sqlite3")).unwrap()
}

#[tokio::test]
async fn baby_records_sort_newest_first_and_upsert_by_id() {
    let dir = TempDir::new().unwrap();
    let records = RecordStore::new(open_store(&dir));

    records
        .save_baby_record(baby_record("a", date(2026, 7, 1), 4.1))
        .await
        .unwrap();
    records
        .save_baby_record(baby_record("b", date(2026, 7, 20), 4.6))
        .await
        .unwrap();
    records
        .save_baby_record(baby_record("c", date(2026, 7, 10), 4.3))
        .await
        .unwrap();

    let loaded = records.baby_records().await;
    let ids: Vec<&str> = loaded.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["b", "c", "a"]);

    // replacing by id keeps one entry
    records
        .save_baby_record(baby_record("a", date(2026, 7, 1), 4.2))
        .await
        .unwrap();
    let loaded = records.baby_records().await;
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.iter().find(|r| r.id == "a").unwrap().weight, Some(4.2));

    records.delete_baby_record("c").await.unwrap();
    assert_eq!(records.baby_records().await.len(), 2);
}

#[tokio::test]
async fn feeding_records_sort_by_date_then_time() {
    let dir = TempDir::new().unwrap();
    let records = RecordStore::new(open_store(&dir));

    records
        .save_feeding_record(feeding_record("early", date(2026, 7, 20), time(6, 30)))
        .await
        .unwrap();
    records
        .save_feeding_record(feeding_record("late", date(2026, 7, 20), time(22, 0)))
        .await
        .unwrap();
    records
        .save_feeding_record(feeding_record("yesterday", date(2026, 7, 19), time(23, 0)))
        .await
        .unwrap();

    let ids: Vec<String> = records
        .feeding_records()
        .await
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, ["late", "early", "yesterday"]);
}

#[tokio::test]
async fn chat_sessions_insert_newest_first() {
    let dir = TempDir::new().unwrap();
    let chat = ChatStore::new(open_store(&dir));

    let mut first = new_session();
    append_message(&mut first, new_message(ChatRole::User, "第一個問題"));
    chat.save_session(first.clone()).await.unwrap();

    let mut second = new_session();
    append_message(&mut second, new_message(ChatRole::User, "第二個問題"));
    chat.save_session(second.clone()).await.unwrap();

    let sessions = chat.sessions().await;
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, second.id);
    assert_eq!(sessions[0].title, "第二個問題");

    // updating an existing session keeps its position
    append_message(&mut first, new_message(ChatRole::Assistant, "回覆"));
    chat.save_session(first.clone()).await.unwrap();
    let sessions = chat.sessions().await;
    assert_eq!(sessions[1].id, first.id);
    assert_eq!(sessions[1].messages.len(), 2);

    chat.delete_session(&second.id).await.unwrap();
    assert_eq!(chat.sessions().await.len(), 1);

    chat.clear().await.unwrap();
    assert!(chat.sessions().await.is_empty());
}

#[tokio::test]
async fn pregnancy_dates_derive_each_other() {
    let dir = TempDir::new().unwrap();
    let pregnancy = PregnancyTracker::new(open_store(&dir));
    let today = date(2026, 8, 5);

    let info = pregnancy
        .set_last_period_date(date(2026, 3, 1), today)
        .await
        .unwrap();
    assert_eq!(info.due_date, Some(date(2026, 12, 6)));
    assert_eq!(info.current_week, Some(22));

    let status = pregnancy.status(today).await.unwrap();
    assert_eq!(status.trimester, 2);
    assert_eq!(status.days_until_due, 123);

    let info = pregnancy.set_due_date(date(2026, 10, 8), today).await.unwrap();
    assert_eq!(info.last_period_date, Some(date(2026, 1, 1)));

    pregnancy.clear().await.unwrap();
    assert!(pregnancy.info().await.is_none());
}

#[tokio::test]
async fn settings_defaults_and_flags() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::new(open_store(&dir));

    assert_eq!(settings.locale().await, "zh-TW");
    settings.set_locale("en-US").await.unwrap();
    assert_eq!(settings.locale().await, "en-US");

    assert!(!settings.welcome_seen().await);
    settings.mark_welcome_seen().await.unwrap();
    assert!(settings.welcome_seen().await);

    assert!(!settings.tracking_notice_seen().await);
    settings.mark_tracking_notice_seen().await.unwrap();
    assert!(settings.tracking_notice_seen().await);

    assert!(settings.ai_config().await.is_none());
    let config = AiConfig {
        provider: AiProvider::Gemini,
        api_key: "key".to_string(),
        model: "gemini-2.5-flash".to_string(),
    };
    settings.set_ai_config(&config).await.unwrap();
    assert_eq!(settings.ai_config().await, Some(config));

    settings.clear_ai_config().await.unwrap();
    assert!(settings.ai_config().await.is_none());
}
