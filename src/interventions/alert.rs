use serde::Serialize;

use crate::engagement::streak::StreakReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    None,
    Warning,
    Success,
}

/// Banner shown next to the streak counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakAlert {
    pub show: bool,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,
    pub sub_message: String,
    pub icon_name: String,
}

impl StreakAlert {
    pub fn hidden() -> Self {
        StreakAlert {
            show: false,
            alert_type: AlertType::None,
            message: String::new(),
            sub_message: String::new(),
            icon_name: String::new(),
        }
    }

    fn shown(alert_type: AlertType, message: &str, sub_message: String, icon_name: &str) -> Self {
        StreakAlert {
            show: true,
            alert_type,
            message: message.to_string(),
            sub_message,
            icon_name: icon_name.to_string(),
        }
    }
}

pub fn build_streak_alert(reason: StreakReason, streak: u32) -> StreakAlert {
    match reason {
        StreakReason::ActiveYesterday if streak > 0 => StreakAlert::shown(
            AlertType::Warning,
            "今日学習するとstreak継続",
            format!("現在{}日連続", streak),
            "alert-triangle",
        ),
        StreakReason::ActiveToday => StreakAlert::shown(
            AlertType::Success,
            "今日学習済み",
            format!("{}日連続 継続中", streak),
            "check",
        ),
        StreakReason::Recovered => StreakAlert::shown(
            AlertType::Success,
            "学習再開しました！",
            "新しいstreakのスタートです".to_string(),
            "flame",
        ),
        StreakReason::ActiveYesterday
        | StreakReason::Broken
        | StreakReason::NoActivityYet
        | StreakReason::Unknown => StreakAlert::hidden(),
    }
}
