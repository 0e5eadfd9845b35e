//! Address lookup and nearby search against the mapping provider.

use tracing::info;

use crate::api::gaode::{AroundSearchRequest, AroundSearchResponse, GeocodeResponse, Poi, SortRule};

use super::{AddressArgs, ChatSender, FeatureError, Features, Mention, NearbyArgs, Outcome, read_json};

pub const DEFAULT_RADIUS: u32 = 1000;

/// How many places a nearby reply lists.
pub const MAX_PLACES: usize = 5;

pub fn format_geocode(response: &GeocodeResponse) -> String {
    match response.geocodes.first() {
        Some(g) => format!("找到啦！\n地址：{}\n坐标：{}", g.formatted_address, g.location),
        None => "没有找到这个地址哦，换个说法试试？".to_string(),
    }
}

fn format_poi(index: usize, poi: &Poi) -> String {
    let mut line = format!("{}. {}", index + 1, poi.name);
    if !poi.distance.is_empty() {
        line.push_str(&format!("（{}米）", poi.distance));
    }
    if !poi.address.is_empty() {
        line.push_str(&format!("\n   {}", poi.address));
    }
    line
}

pub fn format_places(response: &AroundSearchResponse) -> String {
    if response.pois.is_empty() {
        return "附近没有找到相关的地方呢。".to_string();
    }
    let lines: Vec<String> = response
        .pois
        .iter()
        .take(MAX_PLACES)
        .enumerate()
        .map(|(i, poi)| format_poi(i, poi))
        .collect();
    format!("附近的地方：\n{}", lines.join("\n"))
}

impl<S: ChatSender> Features<S> {
    pub async fn address(&self, caller: &Mention, group_id: i64, args: &str) -> Result<Outcome, FeatureError> {
        if !self.permission.check(caller.user_id, group_id) {
            return Ok(Outcome::Ignored);
        }

        let AddressArgs { address, city } = AddressArgs::parse(args).map_err(FeatureError::Invalid)?;
        let response = self.requester.send_address_request(&address, &city).await?;
        let geocode: GeocodeResponse = read_json(response).await?;
        if !geocode.is_ok() {
            return Err(FeatureError::Provider(geocode.info));
        }

        info!("Geocoded '{}' in '{}': {} matches", address, city, geocode.geocodes.len());
        self.reply(group_id, caller, format_geocode(&geocode)).await?;
        Ok(Outcome::Sent)
    }

    pub async fn nearby(&self, caller: &Mention, group_id: i64, args: &str) -> Result<Outcome, FeatureError> {
        if !self.permission.check(caller.user_id, group_id) {
            return Ok(Outcome::Ignored);
        }

        let args = NearbyArgs::parse(args).map_err(FeatureError::Invalid)?;
        let request = AroundSearchRequest::new(
            args.location,
            args.types,
            args.radius.unwrap_or(DEFAULT_RADIUS),
            SortRule::Distance,
        )?;

        let response = self.requester.send_around_search_request(&request).await?;
        let places: AroundSearchResponse = read_json(response).await?;
        if !places.is_ok() {
            return Err(FeatureError::Provider(places.info));
        }

        info!("Nearby '{}' at {}: {} places", request.types(), request.location(), places.pois.len());
        self.reply(group_id, caller, format_places(&places)).await?;
        Ok(Outcome::Sent)
    }
}
