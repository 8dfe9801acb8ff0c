//! Bluetooth module
//!
//! GATT server through which the companion app pushes the time, the clock
//! face settings, the user preferences and today's activity totals.

// Core
use core::mem;

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral,
    },
    raw, Config, Softdevice,
};

// Clock face
use embassy_time::Instant;
use heapless::Vec;
use pinetime_watchface::{
    system::settings::{self, MAX_ENCODED_LEN},
    Activity, Event, Preferences, Settings, TimeReference,
};

use crate::{EVENTS, TIME_REFERENCE};

/// Postcard-encoded configuration value
type Payload = Vec<u8, MAX_ENCODED_LEN>;

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Incomplete, &[ServiceUuid16::CURRENT_TIME])
    .full_name("PineTime")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Incomplete, &[ServiceUuid16::CURRENT_TIME])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub cts: CurrentTimeService,
    pub face: WatchfaceService,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", write)]
    pub current_time: [u8; 10],
}

#[nrf_softdevice::gatt_service(uuid = "8a4b0001-3c2f-4d8e-9a61-5e0f7c2b9d10")]
pub struct WatchfaceService {
    #[characteristic(uuid = "8a4b0002-3c2f-4d8e-9a61-5e0f7c2b9d10", write)]
    pub settings: Payload,
    #[characteristic(uuid = "8a4b0003-3c2f-4d8e-9a61-5e0f7c2b9d10", write)]
    pub preferences: Payload,
    #[characteristic(uuid = "8a4b0004-3c2f-4d8e-9a61-5e0f7c2b9d10", write)]
    pub activity: Payload,
}

pub fn generate_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: b"PineTime" as *const u8 as _,
            current_len: 8,
            max_len: 8,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Decode a configuration write and forward it as an event
fn forward<'a, T>(payload: &'a [u8], event: impl FnOnce(T) -> Event)
where
    T: serde::Deserialize<'a>,
{
    match settings::from_bytes::<T>(payload) {
        Ok(value) => {
            if EVENTS.try_send(event(value)).is_err() {
                defmt::warn!("Event queue full, dropping configuration write");
            }
        }
        Err(err) => defmt::warn!("Ignoring malformed configuration write: {}", err),
    }
}

fn on_current_time(bytes: &[u8]) {
    match TimeReference::from_cts_bytes(bytes, Instant::now().as_millis()) {
        Ok(reference) => TIME_REFERENCE.signal(reference),
        Err(err) => defmt::warn!("Ignoring invalid current time: {}", err),
    }
}

/// Advertise, serve one connection, repeat
#[embassy_executor::task]
pub async fn serve(sd: &'static Softdevice, server: Server) {
    let config = peripheral::Config::default();
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(err) => {
                defmt::warn!("Advertising failed: {}", err);
                continue;
            }
        };
        defmt::info!("Phone connected");

        let err = gatt_server::run(&conn, &server, |event| match event {
            ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
                on_current_time(&bytes)
            }
            ServerEvent::Face(event) => match event {
                WatchfaceServiceEvent::SettingsWrite(payload) => {
                    forward::<Settings>(&payload, Event::Settings)
                }
                WatchfaceServiceEvent::PreferencesWrite(payload) => {
                    forward::<Preferences>(&payload, Event::Preferences)
                }
                WatchfaceServiceEvent::ActivityWrite(payload) => {
                    forward::<Activity>(&payload, Event::Activity)
                }
            },
        })
        .await;
        defmt::info!("Phone disconnected: {}", err);
    }
}
