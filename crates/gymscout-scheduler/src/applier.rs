//! Update applier — writes a merge winner back to the store.

use chrono::Utc;

use gymscout_core::error::Result;
use gymscout_core::traits::GymStore;
use gymscout_core::types::{GymRecord, GymUpdate, SearchCandidate};

/// Overwrite the gym's place data from the winning candidate.
///
/// Phone is only written when the candidate supplied one (the store keeps
/// the existing number otherwise). The place APIs carry no amenity
/// granularity, so refreshed gyms get the common baseline: GX and PT
/// available, group PT / parking / shower unknown-off.
///
/// On success the in-memory record is mutated to mirror the persisted row,
/// so a caller holding the cycle's snapshot sees the refreshed state without
/// re-reading the store.
pub async fn apply_update(
    store: &dyn GymStore,
    gym: &mut GymRecord,
    winner: &SearchCandidate,
) -> Result<()> {
    let update = GymUpdate {
        address: winner.address.clone(),
        phone: winner.phone.clone(),
        latitude: winner.latitude,
        longitude: winner.longitude,
        facilities: format!("{} 검색 결과로 자동 갱신", winner.source),
        has_gx: true,
        has_pt: true,
        has_group_pt: false,
        has_parking: false,
        has_shower: false,
    };

    store.update(gym.id, &update).await?;

    gym.address = update.address;
    if update.phone.is_some() {
        gym.phone = update.phone;
    }
    gym.latitude = update.latitude;
    gym.longitude = update.longitude;
    gym.facilities = Some(update.facilities);
    gym.has_gx = update.has_gx;
    gym.has_pt = update.has_pt;
    gym.has_group_pt = update.has_group_pt;
    gym.has_parking = update.has_parking;
    gym.has_shower = update.has_shower;
    gym.enriched_at = Some(Utc::now());

    tracing::info!(
        "✅ '{}' updated from {} (confidence {:.2})",
        gym.name,
        winner.source,
        winner.confidence
    );
    Ok(())
}
