//! User profile and preference flags.

use serde::{Deserialize, Serialize};

use crate::common::*;

const USER_FIELDS: &[&str] = &[
    "name",
    "email",
    "avatar",
    "currency",
    "language",
    "timezone",
    "notifications",
    "privacy",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub currency: String,
    pub language: String,
    pub timezone: String,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub privacy: PrivacyPreferences,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
    pub weekly_report: bool,
    pub monthly_report: bool,
    pub budget_alerts: bool,
    pub goal_reminders: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
            weekly_report: true,
            monthly_report: true,
            budget_alerts: true,
            goal_reminders: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyPreferences {
    pub share_data: bool,
    pub analytics: bool,
    pub marketing: bool,
}

impl Default for PrivacyPreferences {
    fn default() -> Self {
        Self {
            share_data: false,
            analytics: true,
            marketing: false,
        }
    }
}

/// Partial update for [`UserProfile`]. Nested preference patches merge flag by flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacyPatch>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPatch {
    pub email: Option<bool>,
    pub push: Option<bool>,
    pub sms: Option<bool>,
    pub weekly_report: Option<bool>,
    pub monthly_report: Option<bool>,
    pub budget_alerts: Option<bool>,
    pub goal_reminders: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyPatch {
    pub share_data: Option<bool>,
    pub analytics: Option<bool>,
    pub marketing: Option<bool>,
}

fn set_flag(target: &mut bool, value: Option<bool>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl NotificationPatch {
    pub fn apply(self, prefs: &mut NotificationPreferences) {
        set_flag(&mut prefs.email, self.email);
        set_flag(&mut prefs.push, self.push);
        set_flag(&mut prefs.sms, self.sms);
        set_flag(&mut prefs.weekly_report, self.weekly_report);
        set_flag(&mut prefs.monthly_report, self.monthly_report);
        set_flag(&mut prefs.budget_alerts, self.budget_alerts);
        set_flag(&mut prefs.goal_reminders, self.goal_reminders);
    }
}

impl PrivacyPatch {
    pub fn apply(self, prefs: &mut PrivacyPreferences) {
        set_flag(&mut prefs.share_data, self.share_data);
        set_flag(&mut prefs.analytics, self.analytics);
        set_flag(&mut prefs.marketing, self.marketing);
    }
}

impl UserPatch {
    pub fn apply(self, user: &mut UserProfile) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(currency) = self.currency {
            user.currency = currency;
        }
        if let Some(language) = self.language {
            user.language = language;
        }
        if let Some(timezone) = self.timezone {
            user.timezone = timezone;
        }
        if let Some(notifications) = self.notifications {
            notifications.apply(&mut user.notifications);
        }
        if let Some(privacy) = self.privacy {
            privacy.apply(&mut user.privacy);
        }
        merge_extra(&mut user.extra, self.extra, USER_FIELDS);
    }
}
