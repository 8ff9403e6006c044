use crate::generator::profile::VehicleState;
use mavlink::common::{
    MavAutopilot, MavMessage, MavModeFlag, MavState, MavType, HEARTBEAT_DATA, SYS_STATUS_DATA,
    VFR_HUD_DATA,
};

/// MAVLink messages describing one vehicle snapshot, in send order.
pub fn vehicle_messages(state: &VehicleState) -> Vec<MavMessage> {
    let base_mode = if state.armed {
        MavModeFlag::MAV_MODE_FLAG_SAFETY_ARMED | MavModeFlag::MAV_MODE_FLAG_AUTO_ENABLED
    } else {
        MavModeFlag::MAV_MODE_FLAG_CUSTOM_MODE_ENABLED
    };
    let heartbeat = MavMessage::HEARTBEAT(HEARTBEAT_DATA {
        custom_mode: 0,
        mavtype: MavType::MAV_TYPE_VTOL_TILTROTOR,
        autopilot: MavAutopilot::MAV_AUTOPILOT_GENERIC,
        base_mode,
        system_status: if state.armed {
            MavState::MAV_STATE_ACTIVE
        } else {
            MavState::MAV_STATE_STANDBY
        },
        mavlink_version: 3,
    });

    let hud = MavMessage::VFR_HUD(VFR_HUD_DATA {
        airspeed: state.groundspeed_mps,
        groundspeed: state.groundspeed_mps,
        heading: state.heading_deg.round() as i16 % 360,
        throttle: if state.armed { 55 } else { 0 },
        alt: state.altitude_m,
        climb: state.climb_mps,
    });

    let status = MavMessage::SYS_STATUS(SYS_STATUS_DATA {
        battery_remaining: state.battery_percent.round().clamp(0.0, 100.0) as i8,
        voltage_battery: (14_800.0 + state.battery_percent * 20.0) as u16,
        ..Default::default()
    });

    vec![heartbeat, hud, status]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(armed: bool) -> VehicleState {
        VehicleState {
            time_s: 10.0,
            armed,
            altitude_m: 54.6,
            groundspeed_mps: 16.8,
            climb_mps: 0.0,
            heading_deg: 359.7,
            battery_percent: 93.4,
        }
    }

    #[test]
    fn snapshot_emits_heartbeat_hud_and_status() {
        let messages = vehicle_messages(&snapshot(true));
        assert_eq!(messages.len(), 3);
        match &messages[0] {
            MavMessage::HEARTBEAT(hb) => {
                assert!(hb.base_mode.contains(MavModeFlag::MAV_MODE_FLAG_SAFETY_ARMED))
            }
            other => panic!("unexpected {:?}", other),
        }
        match &messages[1] {
            MavMessage::VFR_HUD(hud) => {
                assert_eq!(hud.alt, 54.6);
                assert_eq!(hud.heading, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &messages[2] {
            MavMessage::SYS_STATUS(status) => assert_eq!(status.battery_remaining, 93),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn disarmed_heartbeat_is_round_tripped_by_console_translation() {
        let messages = vehicle_messages(&snapshot(false));
        let translated = gcscore::link::mav::translate(&messages[0]);
        assert_eq!(
            translated,
            Some(gcscore::link::LinkMessage::Heartbeat { armed: false })
        );
    }
}
