//! Mapping of heterogeneous ad objects onto fixed-column rows.

use crate::client::RawAd;
use crate::error::DecodeError;
use chrono::{Local, TimeZone};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One spreadsheet row. Field order is column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatAdRecord {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Link URL")]
    pub link_url: Option<String>,
    #[serde(rename = "Page Name")]
    pub page_name: Option<String>,
    #[serde(rename = "Image URL")]
    pub image_url: Option<String>,
    #[serde(rename = "Body")]
    pub body_html: Option<String>,
    #[serde(rename = "Creation Time")]
    pub creation_time: Option<String>,
    #[serde(rename = "End Date")]
    pub end_date: Option<String>,
    #[serde(rename = "Page URL")]
    pub page_profile_url: Option<String>,
    #[serde(rename = "Page Like Count")]
    pub page_like_count: Option<i64>,
    #[serde(rename = "Publisher Platforms")]
    pub publisher_platforms: Option<String>,
    #[serde(rename = "Continuation Token")]
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(i64),
}

impl FlatAdRecord {
    pub const HEADERS: [&'static str; 11] = [
        "Title",
        "Link URL",
        "Page Name",
        "Image URL",
        "Body",
        "Creation Time",
        "End Date",
        "Page URL",
        "Page Like Count",
        "Publisher Platforms",
        "Continuation Token",
    ];

    /// Cell values in [`Self::HEADERS`] order; `None` is an empty cell.
    pub fn cells(&self) -> [Option<CellValue<'_>>; 11] {
        fn text(v: &Option<String>) -> Option<CellValue<'_>> {
            v.as_deref().map(CellValue::Text)
        }

        [
            text(&self.title),
            text(&self.link_url),
            text(&self.page_name),
            text(&self.image_url),
            text(&self.body_html),
            text(&self.creation_time),
            text(&self.end_date),
            text(&self.page_profile_url),
            self.page_like_count.map(CellValue::Number),
            text(&self.publisher_platforms),
            text(&self.continuation_token),
        ]
    }
}

/// Flatten ads using the machine's local time zone for timestamps.
pub fn flatten_ads(ads: &[RawAd]) -> Vec<FlatAdRecord> {
    flatten_ads_in(ads, &Local)
}

pub fn flatten_ads_in<Tz>(ads: &[RawAd], tz: &Tz) -> Vec<FlatAdRecord>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ads.iter().map(|raw| flatten_ad_in(raw, tz)).collect()
}

/// Map one ad onto a [`FlatAdRecord`].
///
/// Absent source fields stay absent. A timestamp that fails to decode is
/// logged and left empty; the rest of the record is kept.
pub fn flatten_ad_in<Tz>(raw: &RawAd, tz: &Tz) -> FlatAdRecord
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let ad = &raw.ad;
    let snapshot = ad.get("snapshot");

    let image_url = field(snapshot, "images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(|image| image.get("original_image_url"))
        .and_then(value_to_text);

    let body_html = field(snapshot, "body")
        .and_then(|body| body.get("markup"))
        .and_then(|markup| markup.get("__html"))
        .and_then(value_to_text);

    let creation_time = match decode_timestamp(field(snapshot, "creation_time"), tz) {
        Ok(formatted) => Some(formatted),
        Err(err) => {
            tracing::warn!(ad = %ad_label(ad), error = %err, "Could not decode creation time");
            None
        }
    };

    let end_date = ad
        .get("endDate")
        .filter(|v| is_present(v))
        .and_then(|v| match decode_timestamp(Some(v), tz) {
            Ok(formatted) => Some(formatted),
            Err(err) => {
                tracing::warn!(ad = %ad_label(ad), error = %err, "Could not decode end date");
                None
            }
        });

    FlatAdRecord {
        title: field(snapshot, "title").or_else(|| ad.get("title")).and_then(value_to_text),
        link_url: field(snapshot, "link_url")
            .or_else(|| ad.get("link_url"))
            .and_then(value_to_text),
        page_name: ad
            .get("pageName")
            .or_else(|| field(snapshot, "page_name"))
            .and_then(value_to_text),
        image_url,
        body_html,
        creation_time,
        end_date,
        page_profile_url: field(snapshot, "page_profile_uri").and_then(value_to_text),
        page_like_count: field(snapshot, "page_like_count").and_then(value_to_count),
        publisher_platforms: ad.get("publisherPlatform").and_then(value_to_text),
        continuation_token: raw.continuation_token.clone(),
    }
}

/// Decode Unix epoch seconds to `YYYY-MM-DD HH:MM:SS` in `tz`.
pub fn decode_timestamp<Tz>(value: Option<&Value>, tz: &Tz) -> Result<String, DecodeError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let secs = match value {
        None | Some(Value::Null) => return Err(DecodeError::Missing),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| DecodeError::NotANumber(n.to_string()))?,
        Some(Value::String(s)) => parse_seconds(s).ok_or_else(|| DecodeError::NotANumber(s.clone()))?,
        Some(other) => return Err(DecodeError::NotANumber(other.to_string())),
    };

    let datetime = tz
        .timestamp_opt(secs, 0)
        .single()
        .ok_or(DecodeError::OutOfRange(secs))?;
    Ok(datetime.format(TIMESTAMP_FORMAT).to_string())
}

fn parse_seconds(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

fn field<'a>(obj: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    obj.and_then(|o| o.get(key))
}

// Mirrors truthiness: null, 0, "" and empty collections count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        Value::Array(items) => Some(items.iter().filter_map(value_to_text).collect::<Vec<_>>().join(", ")),
        Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

fn value_to_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn ad_label(ad: &Value) -> String {
    ad.get("adArchiveID")
        .or_else(|| ad.get("ad_archive_id"))
        .and_then(value_to_text)
        .unwrap_or_else(|| "<unknown>".to_string())
}
