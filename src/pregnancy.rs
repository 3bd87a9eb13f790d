use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::PregnancyInfo;
use crate::store::{keys, Store};

/// Naegele's rule: term is 280 days (40 weeks) from the last menstrual
/// period.
pub const TERM_DAYS: i64 = 280;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestationalAge {
    pub weeks: u32,
    pub days: u32,
}

pub fn weeks_from_lmp(lmp: NaiveDate, today: NaiveDate) -> GestationalAge {
    let total_days = (today - lmp).num_days().max(0);
    GestationalAge {
        weeks: (total_days / 7) as u32,
        days: (total_days % 7) as u32,
    }
}

pub fn weeks_from_due_date(due_date: NaiveDate, today: NaiveDate) -> GestationalAge {
    let days_passed = (TERM_DAYS - (due_date - today).num_days()).max(0);
    GestationalAge {
        weeks: (days_passed / 7) as u32,
        days: (days_passed % 7) as u32,
    }
}

pub fn due_date_from_lmp(lmp: NaiveDate) -> NaiveDate {
    lmp + Duration::days(TERM_DAYS)
}

pub fn lmp_from_due_date(due_date: NaiveDate) -> NaiveDate {
    due_date - Duration::days(TERM_DAYS)
}

pub fn days_until_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

pub fn trimester(weeks: u32) -> u8 {
    if weeks < 13 {
        1
    } else if weeks < 27 {
        2
    } else {
        3
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub trimester: u8,
    pub milestone: &'static str,
    pub description: &'static str,
}

const MILESTONES: &[(u32, &str, &str)] = &[
    (4, "著床完成", "受精卵已著床於子宮內膜"),
    (8, "胚胎成形", "主要器官開始發育，心臟開始跳動"),
    (12, "第一孕期結束", "流產風險大幅降低，可以開始告訴親友好消息"),
    (16, "感受胎動", "部分媽媽開始感受到胎動"),
    (20, "高層次超音波", "可進行詳細的胎兒結構檢查"),
    (24, "妊娠糖尿病篩檢", "建議進行妊娠糖尿病篩檢"),
    (28, "第三孕期開始", "寶寶快速成長，媽媽可能感到更疲累"),
    (32, "胎位檢查", "確認寶寶胎位，為生產做準備"),
    (36, "足月在即", "寶寶已接近足月，隨時可能生產"),
    (37, "足月", "寶寶已足月，可以安全出生"),
    (40, "預產期", "預產期到了！隨時準備迎接寶寶"),
];

/// The most recent milestone reached by `weeks`.
pub fn milestone(weeks: u32) -> Milestone {
    let mut current = MILESTONES[0];
    for entry in MILESTONES {
        if weeks >= entry.0 {
            current = *entry;
        }
    }

    Milestone {
        trimester: trimester(weeks),
        milestone: current.1,
        description: current.2,
    }
}

const CHECKUPS: &[(u32, &str)] = &[
    (8, "第一次產檢、超音波確認"),
    (12, "唐氏症篩檢（第一孕期）"),
    (16, "唐氏症篩檢（第二孕期）、羊膜穿刺（如需要）"),
    (20, "高層次超音波"),
    (24, "妊娠糖尿病篩檢"),
    (28, "例行產檢"),
    (30, "例行產檢"),
    (32, "胎位檢查"),
    (34, "例行產檢、乙型鏈球菌篩檢"),
    (36, "每週產檢開始"),
    (38, "例行產檢"),
    (40, "預產期評估"),
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckupSchedule {
    pub completed: Vec<String>,
    pub upcoming: Vec<String>,
}

/// Checkups already due, plus the next three upcoming ones.
pub fn prenatal_checkups(weeks: u32) -> CheckupSchedule {
    let completed = CHECKUPS
        .iter()
        .filter(|c| c.0 <= weeks)
        .map(|c| format!("第 {} 週：{}", c.0, c.1))
        .collect();
    let upcoming = CHECKUPS
        .iter()
        .filter(|c| c.0 > weeks)
        .take(3)
        .map(|c| format!("第 {} 週：{}", c.0, c.1))
        .collect();

    CheckupSchedule { completed, upcoming }
}

pub fn format_week(age: GestationalAge) -> String {
    if age.days == 0 {
        format!("{} 週", age.weeks)
    } else {
        format!("{} 週 {} 天", age.weeks, age.days)
    }
}

/// Derived view for the tracker page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyStatus {
    pub age: GestationalAge,
    pub trimester: u8,
    pub milestone: Milestone,
    pub checkups: CheckupSchedule,
    pub days_until_due: i64,
    pub formatted_week: String,
}

/// Persists the pregnancy dates; either date re-derives the other.
#[derive(Clone)]
pub struct PregnancyTracker {
    store: Store,
}

impl PregnancyTracker {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn info(&self) -> Option<PregnancyInfo> {
        self.store
            .read_or_default::<Option<PregnancyInfo>>(keys::PREGNANCY_INFO)
            .await
    }

    /// Record a due date; LMP and the current gestational age are derived.
    pub async fn set_due_date(&self, due_date: NaiveDate, today: NaiveDate) -> Result<PregnancyInfo> {
        let age = weeks_from_due_date(due_date, today);
        let info = PregnancyInfo {
            due_date: Some(due_date),
            last_period_date: Some(lmp_from_due_date(due_date)),
            current_week: Some(age.weeks),
            current_day: Some(age.days),
        };
        self.store.put(keys::PREGNANCY_INFO, &info).await?;
        Ok(info)
    }

    /// Record the last menstrual period; the due date is derived.
    pub async fn set_last_period_date(
        &self,
        lmp: NaiveDate,
        today: NaiveDate,
    ) -> Result<PregnancyInfo> {
        let age = weeks_from_lmp(lmp, today);
        let info = PregnancyInfo {
            due_date: Some(due_date_from_lmp(lmp)),
            last_period_date: Some(lmp),
            current_week: Some(age.weeks),
            current_day: Some(age.days),
        };
        self.store.put(keys::PREGNANCY_INFO, &info).await?;
        Ok(info)
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(keys::PREGNANCY_INFO).await
    }

    /// Current status derived from the stored due date.
    pub async fn status(&self, today: NaiveDate) -> Option<PregnancyStatus> {
        let due_date = self.info().await?.due_date?;
        let age = weeks_from_due_date(due_date, today);

        Some(PregnancyStatus {
            age,
            trimester: trimester(age.weeks),
            milestone: milestone(age.weeks),
            checkups: prenatal_checkups(age.weeks),
            days_until_due: days_until_due(due_date, today),
            formatted_week: format_week(age),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn gestational_age_from_lmp() {
        let age = weeks_from_lmp(date(2026, 1, 1), date(2026, 3, 12));
        assert_eq!(age, GestationalAge { weeks: 10, days: 0 });

        let age = weeks_from_lmp(date(2026, 1, 1), date(2026, 3, 15));
        assert_eq!(age, GestationalAge { weeks: 10, days: 3 });
    }

    #[test]
    fn gestational_age_from_due_date_clamps_at_zero() {
        // 280 days out means week 0 day 0
        let age = weeks_from_due_date(date(2026, 10, 8), date(2026, 1, 1));
        assert_eq!(age, GestationalAge { weeks: 0, days: 0 });

        // 70 days before the due date -> 30 weeks
        let age = weeks_from_due_date(date(2026, 10, 8), date(2026, 7, 30));
        assert_eq!(age, GestationalAge { weeks: 30, days: 0 });
    }

    #[test]
    fn due_date_conversion_is_symmetric() {
        let lmp = date(2026, 1, 1);
        let due = due_date_from_lmp(lmp);
        assert_eq!(due, date(2026, 10, 8));
        assert_eq!(lmp_from_due_date(due), lmp);
    }

    #[test]
    fn trimester_boundaries() {
        assert_eq!(trimester(0), 1);
        assert_eq!(trimester(12), 1);
        assert_eq!(trimester(13), 2);
        assert_eq!(trimester(26), 2);
        assert_eq!(trimester(27), 3);
        assert_eq!(trimester(40), 3);
    }

    #[test]
    fn milestone_picks_most_recent_week() {
        assert_eq!(milestone(22).milestone, "高層次超音波");
        assert_eq!(milestone(37).milestone, "足月");
        assert_eq!(milestone(2).milestone, "著床完成");
    }

    #[test]
    fn checkup_schedule_splits_and_limits_upcoming() {
        let schedule = prenatal_checkups(25);
        assert_eq!(schedule.completed.len(), 5);
        assert_eq!(schedule.upcoming.len(), 3);
        assert!(schedule.upcoming[0].starts_with("第 28 週"));
    }

    #[test]
    fn week_formatting() {
        assert_eq!(format_week(GestationalAge { weeks: 12, days: 0 }), "12 週");
        assert_eq!(
            format_week(GestationalAge { weeks: 12, days: 4 }),
            "12 週 4 天"
        );
    }
}
