//! One-shot hardware peripheral initialization.
//!
//! Configures the three sensor inputs (D1–D3) and the two relay outputs
//! using raw ESP-IDF sys calls, then installs the GPIO ISR service.
//! Called once from `main()` before the event loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::events::Level;
use crate::sensors::{SensorSeed, SensorsSeeded};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

/// Sensor inputs, all interrupting on both edges.
#[cfg(target_os = "espidf")]
const INPUT_PINS: [i32; 3] = [
    pins::CHAIN_PULSE_GPIO,
    pins::GOING_UP_GPIO,
    pins::GOING_DOWN_GPIO,
];

#[cfg(target_os = "espidf")]
const OUTPUT_PINS: [i32; 2] = [pins::RELAY_UP_GPIO, pins::RELAY_DOWN_GPIO];

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    for &pin in &INPUT_PINS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured (D1 chain, D2 up, D3 down)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe from main and ISR context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── GPIO Outputs ──────────────────────────────────────────────

/// Relays come up de-energized: outputs are driven LOW before the
/// direction is switched to output.
#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &OUTPUT_PINS {
        unsafe { gpio_set_level(pin, 0) };
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: relay outputs configured LOW");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::sensors::{chain_isr, down_switch_isr, up_switch_isr};

#[cfg(target_os = "espidf")]
unsafe extern "C" fn chain_gpio_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: gpio_get_level is a register read; safe in ISR context.
    chain_isr(unsafe { gpio_get_level(pins::CHAIN_PULSE_GPIO) } != 0);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn going_up_gpio_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: as above.
    up_switch_isr(unsafe { gpio_get_level(pins::GOING_UP_GPIO) } != 0);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn going_down_gpio_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: as above.
    down_switch_isr(unsafe { gpio_get_level(pins::GOING_DOWN_GPIO) } != 0);
}

/// Install per-pin GPIO ISR service and register interrupt handlers.
/// Requires the sensor levels to be seeded first; from here on the ISRs
/// are the only writers to the event queue.
#[cfg(target_os = "espidf")]
pub fn init_isr_service(_seeded: SensorsSeeded) -> Result<(), HwInitError> {
    type Handler = unsafe extern "C" fn(*mut core::ffi::c_void);
    let handlers: [(i32, Handler); 3] = [
        (pins::CHAIN_PULSE_GPIO, chain_gpio_isr),
        (pins::GOING_UP_GPIO, going_up_gpio_isr),
        (pins::GOING_DOWN_GPIO, going_down_gpio_isr),
    ];

    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handlers are static
    // functions that only touch atomics and the lock-free event queue.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (pin, handler) in handlers {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_ANYEDGE);
            let ret = gpio_isr_handler_add(pin, Some(handler), core::ptr::null_mut());
            if ret != ESP_OK as i32 {
                return Err(HwInitError::IsrHandlerFailed(ret));
            }
            gpio_intr_enable(pin);
        }
    }

    info!("hw_init: ISR service installed (chain, going-up, going-down: any edge)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service(_seeded: SensorsSeeded) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

/// Current D2/D3 levels, so the control core starts from the real switch
/// state rather than "inactive".  Read before the ISRs are installed.
pub fn read_sensor_levels() -> SensorSeed {
    SensorSeed {
        going_up: Level::from_bool(gpio_read(crate::pins::GOING_UP_GPIO)),
        going_down: Level::from_bool(gpio_read(crate::pins::GOING_DOWN_GPIO)),
    }
}
