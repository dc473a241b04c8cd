//! The prayer wall: an in-memory, newest-first list of prayers with like
//! counters. Nothing is persisted; a restart brings back the seed prayers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::constants::{MAX_PRAYER_CHARS, MIN_PRAYER_CHARS};
use crate::scripture::ScriptureResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerType {
    Encouragement,
    General,
    Gratitude,
    Praise,
    Support,
    Testimony,
}

impl PrayerType {
    /// All categories, sorted by key.
    pub const ALL: [PrayerType; 6] = [
        PrayerType::Encouragement,
        PrayerType::General,
        PrayerType::Gratitude,
        PrayerType::Praise,
        PrayerType::Support,
        PrayerType::Testimony,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PrayerType::Encouragement => "encouragement",
            PrayerType::General => "general",
            PrayerType::Gratitude => "gratitude",
            PrayerType::Praise => "praise",
            PrayerType::Support => "support",
            PrayerType::Testimony => "testimony",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PrayerType::Encouragement => "Encouragement",
            PrayerType::General => "General Prayer",
            PrayerType::Gratitude => "Gratitude",
            PrayerType::Praise => "Praise & Worship",
            PrayerType::Support => "Support Needed",
            PrayerType::Testimony => "Testimony",
        }
    }

    /// Hint shown in an empty prayer box for this category.
    pub fn placeholder(self) -> &'static str {
        match self {
            PrayerType::Encouragement => "Share words to uplift others...",
            PrayerType::General => "Share what's on your heart...",
            PrayerType::Gratitude => "Share what you're thankful for...",
            PrayerType::Praise => "Share a moment of praise or worship...",
            PrayerType::Support => "Share what you need prayer support for...",
            PrayerType::Testimony => "Share how God has worked in your life...",
        }
    }
}

impl fmt::Display for PrayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PrayerType {
    type Err = WallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrayerType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| WallError::UnknownType(s.to_string()))
    }
}

/// Which prayers a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrayerFilter {
    #[default]
    All,
    Only(PrayerType),
}

impl FromStr for PrayerFilter {
    type Err = WallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(PrayerFilter::All),
            other => other.parse().map(PrayerFilter::Only),
        }
    }
}

impl PrayerFilter {
    fn matches(self, prayer: &Prayer) -> bool {
        match self {
            PrayerFilter::All => true,
            PrayerFilter::Only(t) => prayer.prayer_type == t,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WallError {
    #[error("unknown prayer type: {0}")]
    UnknownType(String),

    #[error("Prayer must be between {} and {} characters.", MIN_PRAYER_CHARS, MAX_PRAYER_CHARS)]
    InvalidLength,

    #[error("prayer {0} not found")]
    NotFound(u64),
}

#[derive(Debug, Clone)]
pub struct Prayer {
    pub id: u64,
    pub prayer_type: PrayerType,
    pub content: String,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
    pub is_new: bool,
    pub scripture: Option<ScriptureResponse>,
}

/// Prayer as sent to clients, with the timestamp rendered relative to now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerView {
    pub id: u64,
    #[serde(rename = "type")]
    pub prayer_type: PrayerType,
    pub content: String,
    pub likes: u32,
    pub timestamp: String,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scripture: Option<ScriptureResponse>,
}

impl Prayer {
    pub fn view_at(&self, now: DateTime<Utc>) -> PrayerView {
        PrayerView {
            id: self.id,
            prayer_type: self.prayer_type,
            content: self.content.clone(),
            likes: self.likes,
            timestamp: format_timestamp(self.created_at, now),
            is_new: self.is_new,
            scripture: self.scripture.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallStats {
    pub prayers_shared: usize,
    pub people_praying: u64,
}

/// Render how long ago something happened: "Just now", "5m ago", "3h ago", "2d ago".
pub fn format_timestamp(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", days)
    }
}

/// Check a prayer body against the posting bounds, counted in characters.
pub fn validate_content(content: &str) -> Result<(), WallError> {
    let chars = content.chars().count();
    if content.trim().is_empty() || !(MIN_PRAYER_CHARS..=MAX_PRAYER_CHARS).contains(&chars) {
        return Err(WallError::InvalidLength);
    }
    Ok(())
}

struct WallInner {
    // Newest first.
    prayers: Vec<Prayer>,
    last_id: u64,
}

pub struct PrayerWall {
    inner: RwLock<WallInner>,
}

impl Default for PrayerWall {
    fn default() -> Self {
        Self::new()
    }
}

impl PrayerWall {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(WallInner {
                prayers: Vec::new(),
                last_id: 0,
            }),
        }
    }

    /// A wall pre-filled with the sample prayers, aged relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let prayers: Vec<Prayer> = seed::SEED_PRAYERS
            .iter()
            .enumerate()
            .map(|(i, s)| Prayer {
                id: i as u64 + 1,
                prayer_type: s.prayer_type,
                content: s.content.to_string(),
                likes: s.likes,
                created_at: now - Duration::hours(s.hours_ago),
                is_new: false,
                scripture: Some(s.scripture.clone()),
            })
            .collect();
        let last_id = prayers.len() as u64;
        info!(count = prayers.len(), "Seeded prayer wall");
        Self {
            inner: RwLock::new(WallInner { prayers, last_id }),
        }
    }

    pub async fn list(&self, filter: PrayerFilter) -> Vec<Prayer> {
        let inner = self.inner.read().await;
        inner
            .prayers
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// Filtered prayers and wall-wide stats read under one guard, so the
    /// counts always agree with the listing.
    pub async fn snapshot(&self, filter: PrayerFilter) -> (Vec<Prayer>, WallStats) {
        let inner = self.inner.read().await;
        let prayers = inner
            .prayers
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        (prayers, Self::stats_of(&inner))
    }

    pub async fn get(&self, id: u64) -> Option<Prayer> {
        let inner = self.inner.read().await;
        inner.prayers.iter().find(|p| p.id == id).cloned()
    }

    /// Put a new prayer at the top of the wall.
    ///
    /// The id is the creation time in milliseconds, bumped past the last
    /// issued id when two prayers land in the same millisecond.
    pub async fn add(
        &self,
        prayer_type: PrayerType,
        content: &str,
        scripture: Option<ScriptureResponse>,
        now: DateTime<Utc>,
    ) -> Result<Prayer, WallError> {
        validate_content(content)?;

        let mut inner = self.inner.write().await;
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(inner.last_id + 1);
        inner.last_id = id;

        let prayer = Prayer {
            id,
            prayer_type,
            content: content.trim().to_string(),
            likes: 0,
            created_at: now,
            is_new: true,
            scripture,
        };
        inner.prayers.insert(0, prayer.clone());
        debug!(id, %prayer_type, "Prayer added to wall");
        Ok(prayer)
    }

    pub async fn like(&self, id: u64) -> Result<Prayer, WallError> {
        self.adjust_likes(id, |likes| likes.saturating_add(1)).await
    }

    pub async fn unlike(&self, id: u64) -> Result<Prayer, WallError> {
        self.adjust_likes(id, |likes| likes.saturating_sub(1)).await
    }

    async fn adjust_likes(&self, id: u64, f: impl FnOnce(u32) -> u32) -> Result<Prayer, WallError> {
        let mut inner = self.inner.write().await;
        let prayer = inner
            .prayers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(WallError::NotFound(id))?;
        prayer.likes = f(prayer.likes);
        Ok(prayer.clone())
    }

    pub async fn stats(&self) -> WallStats {
        let inner = self.inner.read().await;
        Self::stats_of(&inner)
    }

    fn stats_of(inner: &WallInner) -> WallStats {
        WallStats {
            prayers_shared: inner.prayers.len(),
            people_praying: inner.prayers.iter().map(|p| u64::from(p.likes)).sum(),
        }
    }
}

mod seed {
    use super::PrayerType;
    use crate::scripture::ScriptureResponse;

    pub(super) struct SeedPrayer {
        pub prayer_type: PrayerType,
        pub content: &'static str,
        pub likes: u32,
        pub hours_ago: i64,
        pub scripture: ScriptureResponse,
    }

    fn scripture(verse: &str, text: &str, context: &str, application: &str) -> ScriptureResponse {
        ScriptureResponse {
            verse: verse.to_string(),
            text: text.to_string(),
            context: context.to_string(),
            application: application.to_string(),
        }
    }

    lazy_static::lazy_static! {
        pub(super) static ref SEED_PRAYERS: Vec<SeedPrayer> = vec![
            SeedPrayer {
                prayer_type: PrayerType::Praise,
                content: "Grateful for God's endless love and mercy. His grace continues to amaze me every day.",
                likes: 12,
                hours_ago: 2,
                scripture: scripture(
                    "Psalm 136:1",
                    "Give thanks to the Lord, for he is good. His love endures forever.",
                    "This psalm emphasizes God's enduring love and mercy, encouraging believers to be thankful for His constant presence and goodness.",
                    "Take time each day to reflect on and give thanks for God's enduring love and mercy in your life.",
                ),
            },
            SeedPrayer {
                prayer_type: PrayerType::Support,
                content: "Please pray for my family during this difficult time. My mother is undergoing surgery next week.",
                likes: 8,
                hours_ago: 4,
                scripture: scripture(
                    "Isaiah 41:10",
                    "So do not fear, for I am with you; do not be dismayed, for I am your God. I will strengthen you and help you; I will uphold you with my righteous right hand.",
                    "God promises His presence and support during difficult times, offering strength and help to those who trust in Him.",
                    "Trust in God's presence and strength during medical challenges, knowing He is with you and your loved ones.",
                ),
            },
            SeedPrayer {
                prayer_type: PrayerType::Gratitude,
                content: "Thankful for my church community and their constant support. They truly show Christ's love in action.",
                likes: 15,
                hours_ago: 6,
                scripture: scripture(
                    "1 Thessalonians 5:11",
                    "Therefore encourage one another and build each other up, just as in fact you are doing.",
                    "Paul reminds us of the importance of community and mutual encouragement among believers.",
                    "Actively participate in and contribute to your faith community, both giving and receiving support and encouragement.",
                ),
            },
            SeedPrayer {
                prayer_type: PrayerType::Encouragement,
                content: "To anyone feeling lost or discouraged today: Remember that God is with you, and His love never fails. Keep holding onto faith.",
                likes: 20,
                hours_ago: 8,
                scripture: scripture(
                    "Joshua 1:9",
                    "Have I not commanded you? Be strong and courageous. Do not be afraid; do not be discouraged, for the Lord your God will be with you wherever you go.",
                    "God encourages Joshua, reminding him of His constant presence and support in all circumstances.",
                    "Face your challenges with courage, knowing that God's presence and support are constant in your life.",
                ),
            },
            SeedPrayer {
                prayer_type: PrayerType::Testimony,
                content: "God answered my prayers for a job! After months of searching, He opened a door I never expected. His timing is perfect.",
                likes: 18,
                hours_ago: 12,
                scripture: scripture(
                    "Psalm 34:8",
                    "Taste and see that the Lord is good; blessed is the one who takes refuge in him.",
                    "David shares his personal experience of God's goodness and encourages others to trust in the Lord.",
                    "Share your experiences of God's faithfulness to encourage others and strengthen their faith.",
                ),
            },
            SeedPrayer {
                prayer_type: PrayerType::Support,
                content: "Seeking prayers for wisdom and guidance as I make important decisions about my future. Need God's direction.",
                likes: 10,
                hours_ago: 24,
                scripture: scripture(
                    "James 1:5",
                    "If any of you lacks wisdom, you should ask God, who gives generously to all without finding fault, and it will be given to you.",
                    "James encourages believers to seek God's wisdom, assuring them of His generous response to sincere requests.",
                    "Approach God confidently in prayer when seeking wisdom, trusting in His generous guidance for your decisions.",
                ),
            },
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_prayer_type_parse_and_label() {
        assert_eq!("praise".parse::<PrayerType>().unwrap(), PrayerType::Praise);
        assert_eq!(PrayerType::Support.label(), "Support Needed");
        assert_eq!(
            "worship".parse::<PrayerType>(),
            Err(WallError::UnknownType("worship".to_string()))
        );
    }

    #[test]
    fn test_prayer_types_sorted_by_key() {
        let keys: Vec<&str> = PrayerType::ALL.iter().map(|t| t.key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<PrayerFilter>().unwrap(), PrayerFilter::All);
        assert_eq!(
            "testimony".parse::<PrayerFilter>().unwrap(),
            PrayerFilter::Only(PrayerType::Testimony)
        );
        assert!("nope".parse::<PrayerFilter>().is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let now = fixed_now();
        assert_eq!(format_timestamp(now, now), "Just now");
        assert_eq!(format_timestamp(now - Duration::seconds(59), now), "Just now");
        assert_eq!(format_timestamp(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_timestamp(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(format_timestamp(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_timestamp(now - Duration::hours(24), now), "1d ago");
        assert_eq!(format_timestamp(now - Duration::days(9), now), "9d ago");
    }

    #[test]
    fn test_validate_content_bounds() {
        assert_eq!(validate_content("too short"), Err(WallError::InvalidLength));
        assert!(validate_content("Ten chars!").is_ok());
        assert!(validate_content(&"a".repeat(500)).is_ok());
        assert_eq!(validate_content(&"a".repeat(501)), Err(WallError::InvalidLength));
        assert_eq!(validate_content("            "), Err(WallError::InvalidLength));
    }

    #[tokio::test]
    async fn test_seeded_wall() {
        let now = fixed_now();
        let wall = PrayerWall::seeded(now);
        let prayers = wall.list(PrayerFilter::All).await;
        assert_eq!(prayers.len(), 6);
        assert_eq!(prayers[0].view_at(now).timestamp, "2h ago");
        assert_eq!(prayers[5].view_at(now).timestamp, "1d ago");
        assert!(prayers.iter().all(|p| !p.is_new && p.scripture.is_some()));

        let stats = wall.stats().await;
        assert_eq!(stats.prayers_shared, 6);
        assert_eq!(stats.people_praying, 12 + 8 + 15 + 20 + 18 + 10);
    }

    #[tokio::test]
    async fn test_add_prepends_and_filters() {
        let now = fixed_now();
        let wall = PrayerWall::seeded(now);
        let added = wall
            .add(PrayerType::Gratitude, "  Thank you for this new day.  ", None, now)
            .await
            .unwrap();
        assert!(added.is_new);
        assert_eq!(added.likes, 0);
        assert_eq!(added.content, "Thank you for this new day.");

        let all = wall.list(PrayerFilter::All).await;
        assert_eq!(all[0].id, added.id);

        let gratitude = wall.list(PrayerFilter::Only(PrayerType::Gratitude)).await;
        assert_eq!(gratitude.len(), 2);
        assert!(gratitude.iter().all(|p| p.prayer_type == PrayerType::Gratitude));

        let support = wall.list(PrayerFilter::Only(PrayerType::Support)).await;
        assert_eq!(support.len(), 2);
    }

    #[tokio::test]
    async fn test_add_same_millisecond_gets_distinct_ids() {
        let now = fixed_now();
        let wall = PrayerWall::new();
        let a = wall.add(PrayerType::General, "First prayer today", None, now).await.unwrap();
        let b = wall.add(PrayerType::General, "Second prayer today", None, now).await.unwrap();
        assert_eq!(a.id, now.timestamp_millis() as u64);
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn test_add_rejects_short_prayer() {
        let wall = PrayerWall::new();
        let err = wall.add(PrayerType::General, "short", None, fixed_now()).await.unwrap_err();
        assert_eq!(err, WallError::InvalidLength);
        assert!(wall.list(PrayerFilter::All).await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_stats_cover_whole_wall() {
        let now = fixed_now();
        let wall = PrayerWall::seeded(now);
        wall.like(2).await.unwrap();

        let (prayers, stats) = wall.snapshot(PrayerFilter::Only(PrayerType::Support)).await;
        assert_eq!(prayers.len(), 2);
        assert_eq!(prayers[0].likes, 9);
        assert_eq!(stats, wall.stats().await);
        assert_eq!(stats.people_praying, 84);
        assert_eq!(stats.prayers_shared, 6);
    }

    #[tokio::test]
    async fn test_like_and_unlike() {
        let wall = PrayerWall::seeded(fixed_now());
        assert_eq!(wall.like(1).await.unwrap().likes, 13);
        assert_eq!(wall.unlike(1).await.unwrap().likes, 12);
        assert_eq!(wall.get(1).await.unwrap().likes, 12);
        assert!(wall.get(42).await.is_none());
        assert_eq!(wall.like(42).await.unwrap_err(), WallError::NotFound(42));

        let now = fixed_now();
        let fresh = wall.add(PrayerType::Praise, "Praise for answered prayer", None, now).await.unwrap();
        assert_eq!(wall.unlike(fresh.id).await.unwrap().likes, 0);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let now = fixed_now();
        let prayer = Prayer {
            id: 7,
            prayer_type: PrayerType::Testimony,
            content: "He made a way where there was none.".to_string(),
            likes: 3,
            created_at: now,
            is_new: true,
            scripture: None,
        };
        let json = serde_json::to_value(prayer.view_at(now)).unwrap();
        assert_eq!(json["type"], "testimony");
        assert_eq!(json["isNew"], true);
        assert_eq!(json["timestamp"], "Just now");
        assert!(json.get("scripture").is_none());
    }
}
