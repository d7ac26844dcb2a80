//! Vehicle state - typed view over the latest attribute mapping
//!
//! A [`VehicleState`] starts out empty and is populated by [`VehicleState::refresh`].
//! Every accessor reads the current mapping; a missing or malformed attribute is
//! reported as a [`StateError`] instead of being replaced with a default.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, instrument, warn};

use crate::attributes::{self, AttributeMap};
use crate::backend::VehicleBackend;
use crate::error::{BackendResult, StateError, StateResult};
use crate::models::{
    ChargingState, Lid, LidState, LockState, ParkingLightState, Window, LID_KEYS, WINDOW_KEYS,
};

/// Format of the `updateTime` attribute
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Latest known state of one vehicle
pub struct VehicleState {
    backend: Arc<dyn VehicleBackend>,
    vin: String,
    attributes: Option<AttributeMap>,
}

impl VehicleState {
    /// Create an empty state for a vehicle. Nothing is fetched until
    /// [`refresh`](Self::refresh) is called.
    pub fn new(backend: Arc<dyn VehicleBackend>, vin: impl Into<String>) -> Self {
        Self {
            backend,
            vin: vin.into(),
            attributes: None,
        }
    }

    /// Vehicle identification number this state belongs to
    pub fn vin(&self) -> &str {
        &self.vin
    }

    /// Fetch the dynamic state from the backend and replace the stored mapping.
    ///
    /// On failure the backend error is returned unchanged and the previously
    /// loaded mapping (if any) is kept.
    #[instrument(skip(self), fields(vin = %self.vin))]
    pub async fn refresh(&mut self) -> BackendResult<()> {
        match self.backend.fetch_dynamic_state(&self.vin).await {
            Ok(attributes) => {
                debug!("Loaded {} attributes", attributes.len());
                self.attributes = Some(attributes);
                Ok(())
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                Err(e)
            }
        }
    }

    /// Whether a mapping has been loaded
    pub fn is_loaded(&self) -> bool {
        self.attributes.is_some()
    }

    /// Raw attribute mapping, if one has been loaded
    pub fn attributes(&self) -> Option<&AttributeMap> {
        self.attributes.as_ref()
    }

    /// Replace the mapping without going through the backend (offline replay, fixtures)
    pub fn set_attributes(&mut self, attributes: AttributeMap) {
        self.attributes = Some(attributes);
    }

    fn loaded(&self) -> StateResult<&AttributeMap> {
        self.attributes.as_ref().ok_or(StateError::NotLoaded)
    }

    // =========================================================================
    // Odometer, fuel and range
    // =========================================================================

    /// Odometer reading, in [`unit_of_length`](Self::unit_of_length)
    pub fn mileage(&self) -> StateResult<u64> {
        attributes::unsigned(self.loaded()?, "mileage")
    }

    /// Unit of all distances, as reported (e.g. `"km"`)
    pub fn unit_of_length(&self) -> StateResult<&str> {
        attributes::string(self.loaded()?, "unitOfLength")
    }

    /// Unit of fuel volumes, as reported (e.g. `"l"`)
    pub fn unit_of_volume(&self) -> StateResult<&str> {
        attributes::string(self.loaded()?, "unitOfVolume")
    }

    /// Fuel left in the tank, in [`unit_of_volume`](Self::unit_of_volume)
    pub fn remaining_fuel(&self) -> StateResult<f64> {
        attributes::float(self.loaded()?, "remaining_fuel")
    }

    /// Range on the remaining fuel
    pub fn remaining_range_fuel(&self) -> StateResult<f64> {
        attributes::float(self.loaded()?, "beRemainingRangeFuel")
    }

    /// Range on the remaining battery charge
    pub fn remaining_range_electric(&self) -> StateResult<f64> {
        attributes::float(self.loaded()?, "beRemainingRangeElectric")
    }

    /// Electric range with a fully charged battery
    pub fn max_range_electric(&self) -> StateResult<f64> {
        attributes::float(self.loaded()?, "beMaxRangeElectric")
    }

    // =========================================================================
    // Charging
    // =========================================================================

    /// High-voltage battery state of charge in percent
    pub fn charging_level_hv(&self) -> StateResult<f64> {
        attributes::float(self.loaded()?, "chargingLevelHv")
    }

    /// Charging state of the high-voltage battery
    pub fn charging_status(&self) -> StateResult<ChargingState> {
        attributes::parsed(self.loaded()?, "charging_status")
    }

    // =========================================================================
    // Time and position
    // =========================================================================

    /// When the vehicle last reported its state
    pub fn timestamp(&self) -> StateResult<NaiveDateTime> {
        let raw = attributes::string(self.loaded()?, "updateTime")?;
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| StateError::invalid("updateTime", format!("'{}': {}", raw, e)))
    }

    /// Why the vehicle sent this update (e.g. `"VEHCSHUTDOWN_SECURED"`)
    pub fn last_update_reason(&self) -> StateResult<&str> {
        attributes::string(self.loaded()?, "lastUpdateReason")
    }

    /// Last known position as `(latitude, longitude)`
    pub fn gps_position(&self) -> StateResult<(f64, f64)> {
        let map = self.loaded()?;
        let lat = attributes::float(map, "gps_lat")?;
        let lng = attributes::float(map, "gps_lng")?;
        Ok((lat, lng))
    }

    // =========================================================================
    // Locks and lights
    // =========================================================================

    /// Central locking state
    pub fn door_lock_state(&self) -> StateResult<LockState> {
        attributes::parsed(self.loaded()?, "door_lock_state")
    }

    /// Which parking lights are switched on
    pub fn parking_lights(&self) -> StateResult<ParkingLightState> {
        attributes::parsed(self.loaded()?, "lights_parking")
    }

    /// Whether any parking light is on
    pub fn are_parking_lights_on(&self) -> StateResult<bool> {
        Ok(self.parking_lights()? != ParkingLightState::Off)
    }

    // =========================================================================
    // Lids and windows
    // =========================================================================

    /// Doors, hood and trunk present in the current mapping
    pub fn lids(&self) -> StateResult<LidIter<'_>> {
        Ok(LidIter::new(self.loaded()?, LID_KEYS))
    }

    /// Lids whose state is anything but [`LidState::Closed`]
    pub fn open_lids(&self) -> StateResult<impl Iterator<Item = StateResult<Lid>> + '_> {
        Ok(self.lids()?.open())
    }

    /// True if no lid is open
    pub fn all_lids_closed(&self) -> StateResult<bool> {
        first_open(self.lids()?).map(|open| open.is_none())
    }

    /// Windows and sunroof present in the current mapping
    pub fn windows(&self) -> StateResult<LidIter<'_>> {
        Ok(LidIter::new(self.loaded()?, WINDOW_KEYS))
    }

    /// Windows whose state is anything but [`LidState::Closed`]
    pub fn open_windows(&self) -> StateResult<impl Iterator<Item = StateResult<Window>> + '_> {
        Ok(self.windows()?.open())
    }

    /// True if no window is open
    pub fn all_windows_closed(&self) -> StateResult<bool> {
        first_open(self.windows()?).map(|open| open.is_none())
    }
}

impl std::fmt::Debug for VehicleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleState")
            .field("vin", &self.vin)
            .field("attributes", &self.attributes.as_ref().map(|a| a.len()))
            .finish()
    }
}

/// Returns the first element that is not closed, or the first parse error
fn first_open(iter: LidIter<'_>) -> StateResult<Option<Lid>> {
    for lid in iter {
        let lid = lid?;
        if !lid.is_closed() {
            return Ok(Some(lid));
        }
    }
    Ok(None)
}

/// Iterator over the lid views of one key class.
///
/// Keys missing from the mapping are skipped; a present key with an
/// unrecognised value yields an error for that element.
#[derive(Debug, Clone)]
pub struct LidIter<'a> {
    map: &'a AttributeMap,
    keys: std::slice::Iter<'static, &'static str>,
}

impl<'a> LidIter<'a> {
    fn new(map: &'a AttributeMap, keys: &'static [&'static str]) -> Self {
        Self {
            map,
            keys: keys.iter(),
        }
    }

    /// Keep only elements that are not closed (errors are passed through)
    pub fn open(self) -> impl Iterator<Item = StateResult<Lid>> + 'a {
        self.filter(|lid| !matches!(lid, Ok(l) if l.is_closed()))
    }
}

impl Iterator for LidIter<'_> {
    type Item = StateResult<Lid>;

    fn next(&mut self) -> Option<Self::Item> {
        for &key in self.keys.by_ref() {
            if !self.map.contains_key(key) {
                continue;
            }
            return Some(attributes::parsed::<LidState>(self.map, key).map(|s| Lid::new(key, s)));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    const FIXTURE: &str = include_str!("../fixtures/dynamic.json");

    fn fixture_attributes() -> AttributeMap {
        let doc: Value = serde_json::from_str(FIXTURE).unwrap();
        doc["attributesMap"].as_object().unwrap().clone()
    }

    /// Backend that replays queued responses
    struct ScriptedBackend {
        responses: Mutex<Vec<BackendResult<AttributeMap>>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<BackendResult<AttributeMap>>) -> Arc<Self> {
            let mut responses = responses;
            responses.reverse();
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl VehicleBackend for ScriptedBackend {
        async fn fetch_dynamic_state(&self, _vin: &str) -> BackendResult<AttributeMap> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(BackendError::Transport("no scripted response".into())))
        }
    }

    fn loaded_state() -> VehicleState {
        let mut state = VehicleState::new(ScriptedBackend::new(vec![]), "G31VIN");
        state.set_attributes(fixture_attributes());
        state
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-7,
            "{} is not approximately {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_parse() {
        let state = loaded_state();

        assert_eq!(state.mileage().unwrap(), 2201);
        assert_eq!(state.unit_of_length().unwrap(), "km");

        let expected = NaiveDate::from_ymd_opt(2018, 2, 17)
            .unwrap()
            .and_hms_opt(12, 15, 36)
            .unwrap();
        assert_eq!(state.timestamp().unwrap(), expected);

        let (lat, lng) = state.gps_position().unwrap();
        assert_approx(lat, -34.4);
        assert_approx(lng, 25.26);

        assert_approx(state.remaining_fuel().unwrap(), 19.0);
        assert_eq!(state.unit_of_volume().unwrap(), "l");
        assert_approx(state.remaining_range_fuel().unwrap(), 202.0);
    }

    #[test]
    fn test_electric_and_lights() {
        let state = loaded_state();

        assert_approx(state.remaining_range_electric().unwrap(), 0.0);
        assert_approx(state.max_range_electric().unwrap(), 0.0);
        assert_approx(state.charging_level_hv().unwrap(), 0.0);
        assert_eq!(state.charging_status().unwrap(), ChargingState::NoCharging);
        assert_eq!(state.parking_lights().unwrap(), ParkingLightState::Off);
        assert!(!state.are_parking_lights_on().unwrap());
        assert_eq!(state.last_update_reason().unwrap(), "VEHCSHUTDOWN_SECURED");
    }

    #[test]
    fn test_missing_attribute() {
        let mut state = VehicleState::new(ScriptedBackend::new(vec![]), "G31VIN");
        state.set_attributes(AttributeMap::new());

        assert_eq!(
            state.mileage().unwrap_err(),
            StateError::MissingAttribute("mileage".into())
        );
        assert!(state.gps_position().is_err());
        // An empty mapping has no lids, so nothing is open
        assert_eq!(state.lids().unwrap().count(), 0);
        assert!(state.all_lids_closed().unwrap());
    }

    #[test]
    fn test_gps_position_needs_both_coordinates() {
        for (removed, kept) in [("gps_lng", "gps_lat"), ("gps_lat", "gps_lng")] {
            let mut attributes = fixture_attributes();
            attributes.remove(removed);
            let mut state = loaded_state();
            state.set_attributes(attributes);

            assert!(state.attributes().unwrap().contains_key(kept));
            assert_eq!(
                state.gps_position().unwrap_err(),
                StateError::MissingAttribute(removed.into())
            );
        }
    }

    #[test]
    fn test_no_attributes() {
        let state = VehicleState::new(ScriptedBackend::new(vec![]), "G31VIN");

        assert!(!state.is_loaded());
        assert_eq!(state.mileage().unwrap_err(), StateError::NotLoaded);
        assert_eq!(state.timestamp().unwrap_err(), StateError::NotLoaded);
        assert_eq!(state.door_lock_state().unwrap_err(), StateError::NotLoaded);
        assert!(matches!(state.lids(), Err(StateError::NotLoaded)));
        assert!(matches!(state.all_windows_closed(), Err(StateError::NotLoaded)));
    }

    #[test]
    fn test_malformed_timestamp() {
        let mut attributes = fixture_attributes();
        attributes.insert("updateTime".into(), json!("2018-02-17T12:15:36"));
        let mut state = loaded_state();
        state.set_attributes(attributes);

        assert!(matches!(
            state.timestamp(),
            Err(StateError::InvalidAttribute { ref key, .. }) if key == "updateTime"
        ));
    }

    #[test]
    fn test_lids() {
        let mut state = loaded_state();

        let lids: Vec<Lid> = state.lids().unwrap().map(Result::unwrap).collect();
        assert_eq!(lids.len(), LID_KEYS.len());
        for lid in &lids {
            assert_eq!(lid.state, LidState::Closed);
        }

        assert_eq!(state.open_lids().unwrap().count(), 0);
        assert!(state.all_lids_closed().unwrap());

        let mut attributes = fixture_attributes();
        attributes.insert("door_driver_front".into(), json!("OPEN"));
        state.set_attributes(attributes);

        assert!(!state.all_lids_closed().unwrap());
        let open: Vec<Lid> = state.open_lids().unwrap().map(Result::unwrap).collect();
        assert_eq!(open, vec![Lid::new("door_driver_front", LidState::Open)]);
    }

    #[test]
    fn test_windows() {
        let mut state = loaded_state();

        for window in state.windows().unwrap() {
            assert_eq!(window.unwrap().state, LidState::Closed);
        }
        assert_eq!(state.open_windows().unwrap().count(), 0);
        assert!(state.all_windows_closed().unwrap());

        let mut attributes = fixture_attributes();
        attributes.insert("window_driver_front".into(), json!("INTERMEDIATE"));
        state.set_attributes(attributes);

        assert!(!state.all_windows_closed().unwrap());
        // Lids are unaffected by window changes
        assert!(state.all_lids_closed().unwrap());
    }

    #[test]
    fn test_unknown_lid_value_is_an_error() {
        let mut attributes = fixture_attributes();
        attributes.insert("trunk_state".into(), json!("AJAR"));
        let mut state = loaded_state();
        state.set_attributes(attributes);

        let errors: Vec<StateError> = state.lids().unwrap().filter_map(Result::err).collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            StateError::InvalidAttribute { key, .. } if key == "trunk_state"
        ));
        assert!(state.all_lids_closed().is_err());
    }

    #[test]
    fn test_door_locks() {
        let state = loaded_state();
        assert_eq!(state.door_lock_state().unwrap(), LockState::Secured);
    }

    #[tokio::test]
    async fn test_refresh() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::Transport("connection refused".into())),
            Ok(fixture_attributes()),
        ]);
        let mut state = VehicleState::new(backend, "G31VIN");

        let err = state.refresh().await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        assert_eq!(state.mileage().unwrap_err(), StateError::NotLoaded);

        state.refresh().await.unwrap();
        assert_eq!(state.mileage().unwrap(), 2201);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_mapping() {
        let backend = ScriptedBackend::new(vec![
            Ok(fixture_attributes()),
            Err(BackendError::Status {
                status: 500,
                message: "boom".into(),
            }),
        ]);
        let mut state = VehicleState::new(backend, "G31VIN");

        state.refresh().await.unwrap();
        assert!(state.refresh().await.is_err());
        assert_eq!(state.mileage().unwrap(), 2201);
    }
}
