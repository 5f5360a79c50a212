// File: ./src/model/temporal.rs
//! Temporal extraction.
//!
//! The pipeline only talks to a [`DateResolver`]: text in, ordered list of
//! `{matched_text, date, day_certain}` out. [`SmartDateResolver`] is the
//! bundled adapter; any other natural-language resolver can be plugged in
//! behind the same trait.
use anyhow::Result;
use chrono::{
    DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

pub const EXACT_CONFIDENCE: f32 = 0.9;
pub const RELATIVE_CONFIDENCE: f32 = 0.7;

/// One date-like phrase as reported by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub matched_text: String,
    pub date: DateTime<Utc>,
    /// Whether the day itself was stated explicitly rather than implied.
    pub day_certain: bool,
}

pub trait DateResolver {
    /// Resolve every date phrase in `text`, ordered by position.
    fn resolve(&self, text: &str, reference: DateTime<Local>) -> Result<Vec<ResolvedDate>>;
}

impl<R: DateResolver + ?Sized> DateResolver for &R {
    fn resolve(&self, text: &str, reference: DateTime<Local>) -> Result<Vec<ResolvedDate>> {
        (**self).resolve(text, reference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    Exact,
    Relative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalMatch {
    pub date: DateTime<Utc>,
    pub confidence: f32,
    #[serde(rename = "type")]
    pub kind: TemporalKind,
    pub matched_text: String,
}

impl From<ResolvedDate> for TemporalMatch {
    fn from(r: ResolvedDate) -> Self {
        let (kind, confidence) = if r.day_certain {
            (TemporalKind::Exact, EXACT_CONFIDENCE)
        } else {
            (TemporalKind::Relative, RELATIVE_CONFIDENCE)
        };
        Self {
            date: r.date,
            confidence,
            kind,
            matched_text: r.matched_text,
        }
    }
}

/// Run the resolver over one candidate. A failing resolver yields no matches.
pub fn extract_dates<R: DateResolver + ?Sized>(
    resolver: &R,
    candidate: &str,
    reference: DateTime<Local>,
) -> Vec<TemporalMatch> {
    match resolver.resolve(candidate, reference) {
        Ok(found) => found.into_iter().map(TemporalMatch::from).collect(),
        Err(e) => {
            log::warn!("Date resolver failed on '{}': {:#}", candidate, e);
            Vec::new()
        }
    }
}

// --- Bundled resolver ---

/// Rule-based English resolver for the phrases people type into quick captures:
/// `today`, `tomorrow at 3pm`, `next friday`, `in 2 weeks`, `2025-03-01`, `March 5th 9:30`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartDateResolver;

/// Time applied to a day without an explicit time.
const DEFAULT_HOUR: u32 = 12;
const TONIGHT_HOUR: u32 = 20;

struct Word {
    start: usize,
    end: usize,
    lower: String,
}

fn split_words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut start = None;
    for (idx, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(idx),
            (true, Some(s)) => {
                let raw = &text[s..idx];
                let cleaned = raw.trim_end_matches(['.', ',', ';', '!', '?', ')']);
                let lead = cleaned.len() - cleaned.trim_start_matches('(').len();
                let cleaned = &cleaned[lead..];
                if !cleaned.is_empty() {
                    words.push(Word {
                        start: s + lead,
                        end: s + lead + cleaned.len(),
                        lower: cleaned.to_lowercase(),
                    });
                }
                start = None;
            }
            _ => {}
        }
    }
    words
}

struct DayAnchor {
    date: NaiveDate,
    consumed: usize,
    certain: bool,
    time: Option<NaiveTime>,
}

fn parse_weekday_name(s: &str) -> Option<Weekday> {
    match s {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Full names, plus abbreviations such as `sun` or `sat`. The short forms
/// are ordinary English words too, so callers only accept them after a
/// `next`, `this` or `on`.
fn parse_weekday(s: &str) -> Option<Weekday> {
    parse_weekday_name(s).or(match s {
        "mon" => Some(Weekday::Mon),
        "tue" | "tues" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    })
}

fn parse_month(s: &str) -> Option<u32> {
    match s {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

fn parse_day_of_month(s: &str) -> Option<u32> {
    let digits = s
        .strip_suffix("st")
        .or_else(|| s.strip_suffix("nd"))
        .or_else(|| s.strip_suffix("rd"))
        .or_else(|| s.strip_suffix("th"))
        .unwrap_or(s);
    digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
}

fn parse_english_number(s: &str) -> Option<u32> {
    match s {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        _ => s.parse::<u32>().ok(),
    }
}

fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let mut d = from + Duration::days(1);
    while d.weekday() != target {
        d += Duration::days(1);
    }
    d
}

fn offset_date(from: NaiveDate, amount: u32, unit: &str) -> Option<NaiveDate> {
    match unit {
        "day" | "days" => from.checked_add_signed(Duration::days(i64::from(amount))),
        "week" | "weeks" => from.checked_add_signed(Duration::weeks(i64::from(amount))),
        "month" | "months" => from.checked_add_months(Months::new(amount)),
        "year" | "years" => from.checked_add_months(Months::new(amount.checked_mul(12)?)),
        _ => None,
    }
}

fn parse_12h(s: &str, is_pm: bool) -> Option<NaiveTime> {
    let (h, m) = if let Some((h_str, m_str)) = s.split_once(':') {
        (h_str.parse::<u32>().ok()?, m_str.parse::<u32>().ok()?)
    } else {
        (s.parse::<u32>().ok()?, 0)
    };
    if !(1..=12).contains(&h) || m > 59 {
        return None;
    }
    let h_24 = match (h, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(h_24, m, 0)
}

fn parse_time_string(s: &str) -> Option<NaiveTime> {
    match s {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }
    if let Some(stripped) = s.strip_suffix("am") {
        return parse_12h(stripped, false);
    }
    if let Some(stripped) = s.strip_suffix("pm") {
        return parse_12h(stripped, true);
    }
    if let Some((h_str, m_str)) = s.split_once(':')
        && m_str.len() == 2
    {
        let h = h_str.parse::<u32>().ok()?;
        let m = m_str.parse::<u32>().ok()?;
        return NaiveTime::from_hms_opt(h, m, 0);
    }
    None
}

/// A time at `words[i]`, optionally split as `10 am`. Returns words consumed.
fn parse_time_at(words: &[Word], i: usize) -> Option<(NaiveTime, usize)> {
    let word = words.get(i)?;
    if let Some(t) = parse_time_string(&word.lower) {
        return Some((t, 1));
    }
    let suffix = words.get(i + 1)?.lower.as_str();
    let is_pm = match suffix {
        "am" | "a.m" => false,
        "pm" | "p.m" => true,
        _ => return None,
    };
    parse_12h(&word.lower, is_pm).map(|t| (t, 2))
}

/// A time right after a day anchor, with an optional leading `at`.
fn trailing_time(words: &[Word], i: usize) -> Option<(NaiveTime, usize)> {
    if words.get(i).is_some_and(|w| w.lower == "at") {
        return parse_time_at(words, i + 1).map(|(t, n)| (t, n + 1));
    }
    parse_time_at(words, i)
}

fn parse_day_anchor(words: &[Word], i: usize, today: NaiveDate) -> Option<DayAnchor> {
    let word = words.get(i)?.lower.as_str();
    let next = words.get(i + 1).map(|w| w.lower.as_str());
    let relative = |date: NaiveDate, consumed: usize| DayAnchor {
        date,
        consumed,
        certain: false,
        time: None,
    };

    let after_weekday_cue = i > 0 && words[i - 1].lower == "on";

    match word {
        "today" => return Some(relative(today, 1)),
        "tomorrow" => return Some(relative(today + Duration::days(1), 1)),
        "yesterday" => return Some(relative(today - Duration::days(1), 1)),
        "tonight" => {
            return Some(DayAnchor {
                time: NaiveTime::from_hms_opt(TONIGHT_HOUR, 0, 0),
                ..relative(today, 1)
            });
        }
        "next" => {
            let unit = next?;
            if let Some(wd) = parse_weekday(unit) {
                return Some(relative(next_weekday(today, wd), 2));
            }
            return offset_date(today, 1, unit).map(|d| relative(d, 2));
        }
        "this" => {
            let wd = parse_weekday(next?)?;
            return Some(relative(next_weekday(today, wd), 2));
        }
        "in" => {
            let amount = parse_english_number(next?)?;
            let unit = words.get(i + 2)?.lower.as_str();
            return offset_date(today, amount, unit).map(|d| relative(d, 3));
        }
        _ => {}
    }

    let weekday = if after_weekday_cue {
        parse_weekday(word)
    } else {
        parse_weekday_name(word)
    };
    if let Some(wd) = weekday {
        return Some(relative(next_weekday(today, wd), 1));
    }

    if let Ok(date) = NaiveDate::parse_from_str(word, "%Y-%m-%d") {
        return Some(DayAnchor {
            date,
            consumed: 1,
            certain: true,
            time: None,
        });
    }

    // "March 5th" or "5 March". A month name alone is never a date.
    let (month, day) = if let Some(m) = parse_month(word) {
        (m, next.and_then(parse_day_of_month)?)
    } else {
        let d = parse_day_of_month(word)?;
        (next.and_then(parse_month)?, d)
    };
    let mut date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date < today {
        date = NaiveDate::from_ymd_opt(today.year() + 1, month, day)?;
    }
    Some(DayAnchor {
        date,
        consumed: 2,
        certain: true,
        time: None,
    })
}

fn to_utc(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

impl DateResolver for SmartDateResolver {
    fn resolve(&self, text: &str, reference: DateTime<Local>) -> Result<Vec<ResolvedDate>> {
        let words = split_words(text);
        let today = reference.date_naive();
        let default_time = NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid default time"))?;
        let mut found = Vec::new();
        let mut i = 0;

        while i < words.len() {
            let start = i;
            let resolved = if let Some(anchor) = parse_day_anchor(&words, i, today) {
                i += anchor.consumed;
                let time = match trailing_time(&words, i) {
                    Some((t, n)) => {
                        i += n;
                        t
                    }
                    None => anchor.time.unwrap_or(default_time),
                };
                Some((anchor.date, time, anchor.certain))
            } else if let Some((time, n)) = parse_time_at(&words, i) {
                i += n;
                // "3pm tomorrow" / "3pm on friday"
                let skip_on = usize::from(words.get(i).is_some_and(|w| w.lower == "on"));
                match parse_day_anchor(&words, i + skip_on, today) {
                    Some(anchor) => {
                        i += skip_on + anchor.consumed;
                        Some((anchor.date, time, anchor.certain))
                    }
                    None => Some((today, time, false)),
                }
            } else {
                None
            };

            match resolved {
                Some((date, time, certain)) => {
                    let span = &text[words[start].start..words[i - 1].end];
                    if let Some(dt) = to_utc(date, time) {
                        found.push(ResolvedDate {
                            matched_text: span.to_string(),
                            date: dt,
                            day_certain: certain,
                        });
                    } else {
                        log::debug!("Skipping '{}': no such local time", span);
                    }
                }
                None => i += 1,
            }
        }
        Ok(found)
    }
}
