// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures: an in-memory firmware and a caller address space.

#![allow(dead_code)]

use efi_runtime::boundary::FlatMemory;
use efi_runtime::ioctl::IoctlArg;
use efi_runtime::runtime::{TimeCapabilities, VariableAttributes};
use efi_runtime::services::RuntimeServices;
use efi_runtime::time::Time;
use efi_runtime::{Char16, Guid, Status, VariableName};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use time::UtcOffset;

/// First address of the caller's memory.
pub const BASE: u64 = 0x7fff_0000;

/// Size of the caller's memory.
pub const MEM_SIZE: usize = 0x1000;

/// Fill byte of caller memory the gateway has not written.
pub const UNTOUCHED: u8 = 0xcc;

type VariableKey = (Vec<Char16>, [u8; 16]);

#[derive(Debug)]
struct State {
    variables: BTreeMap<VariableKey, (VariableAttributes, Vec<u8>)>,
    clock: Time,
    wakeup_enabled: bool,
    wakeup_pending: bool,
    wakeup: Time,
}

/// Firmware double with a variable store, a clock and a wake alarm.
///
/// Times are checked the way a real clock driver would: fields out of range
/// or dates that do not exist are refused with `INVALID_PARAMETER`.
#[derive(Debug)]
pub struct FakeFirmware {
    state: Mutex<State>,
    calls: AtomicUsize,
    pub capabilities: TimeCapabilities,
}

impl FakeFirmware {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                variables: BTreeMap::new(),
                clock: sample_time(),
                wakeup_enabled: false,
                wakeup_pending: false,
                wakeup: Time::invalid(),
            }),
            calls: AtomicUsize::new(0),
            capabilities: TimeCapabilities {
                resolution: 1,
                accuracy: 50_000_000,
                sets_to_zero: false,
            },
        }
    }

    /// Number of firmware calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn insert_variable(
        &self,
        name: &str,
        vendor: Guid,
        attributes: VariableAttributes,
        data: &[u8],
    ) {
        let name: VariableName = name.parse().unwrap();
        self.state.lock().unwrap().variables.insert(
            (name.as_slice_with_nul().to_vec(), vendor.to_bytes()),
            (attributes, data.to_vec()),
        );
    }

    pub fn variable(&self, name: &str, vendor: Guid) -> Option<(VariableAttributes, Vec<u8>)> {
        let name: VariableName = name.parse().unwrap();
        self.state
            .lock()
            .unwrap()
            .variables
            .get(&(name.as_slice_with_nul().to_vec(), vendor.to_bytes()))
            .cloned()
    }

    pub fn clock(&self) -> Time {
        self.state.lock().unwrap().clock
    }

    /// Marks the wake alarm as fired.
    pub fn fire_alarm(&self) {
        self.state.lock().unwrap().wakeup_pending = true;
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn is_real_time(time: &Time) -> bool {
    time.to_offset_date_time(UtcOffset::UTC).is_ok()
}

impl RuntimeServices for FakeFirmware {
    fn get_variable(
        &self,
        name: &[Char16],
        vendor: &Guid,
        attributes: &mut VariableAttributes,
        data_size: &mut usize,
        data: &mut [u8],
    ) -> Status {
        self.count();
        assert_eq!(*data_size, data.len());
        assert_eq!(name.last(), Some(&0), "name must be terminated");

        let state = self.state.lock().unwrap();
        let Some((attrs, value)) = state.variables.get(&(name.to_vec(), vendor.to_bytes()))
        else {
            return Status::NOT_FOUND;
        };
        if value.len() > data.len() {
            *data_size = value.len();
            return Status::BUFFER_TOO_SMALL;
        }
        data[..value.len()].copy_from_slice(value);
        *data_size = value.len();
        *attributes = *attrs;
        Status::SUCCESS
    }

    fn set_variable(
        &self,
        name: &[Char16],
        vendor: &Guid,
        attributes: VariableAttributes,
        data: &[u8],
    ) -> Status {
        self.count();
        assert_eq!(name.last(), Some(&0), "name must be terminated");

        let key = (name.to_vec(), vendor.to_bytes());
        let mut state = self.state.lock().unwrap();
        if data.is_empty() || attributes.is_empty() {
            return match state.variables.remove(&key) {
                Some(_) => Status::SUCCESS,
                None => Status::NOT_FOUND,
            };
        }
        if !attributes.contains(VariableAttributes::RUNTIME_ACCESS) {
            return Status::INVALID_PARAMETER;
        }
        state.variables.insert(key, (attributes, data.to_vec()));
        Status::SUCCESS
    }

    fn get_time(&self, time: &mut Time, capabilities: &mut TimeCapabilities) -> Status {
        self.count();
        *time = self.state.lock().unwrap().clock;
        *capabilities = self.capabilities;
        Status::SUCCESS
    }

    fn set_time(&self, time: &Time) -> Status {
        self.count();
        if !is_real_time(time) {
            return Status::INVALID_PARAMETER;
        }
        self.state.lock().unwrap().clock = *time;
        Status::SUCCESS
    }

    fn get_wakeup_time(&self, enabled: &mut bool, pending: &mut bool, time: &mut Time) -> Status {
        self.count();
        let state = self.state.lock().unwrap();
        *enabled = state.wakeup_enabled;
        *pending = state.wakeup_pending;
        *time = state.wakeup;
        Status::SUCCESS
    }

    fn set_wakeup_time(&self, enable: bool, time: &Time) -> Status {
        self.count();
        let mut state = self.state.lock().unwrap();
        if enable {
            if !is_real_time(time) {
                return Status::INVALID_PARAMETER;
            }
            state.wakeup = *time;
        }
        state.wakeup_enabled = enable;
        Status::SUCCESS
    }
}

pub fn sample_time() -> Time {
    Time {
        year: 2023,
        month: 6,
        day: 1,
        hour: 8,
        minute: 30,
        second: 15,
        nanosecond: 500,
        time_zone: 120,
        ..Time::invalid()
    }
}

/// The caller's address space: one page at [`BASE`], initially filled with
/// [`UNTOUCHED`].
pub struct Caller {
    pub bytes: Vec<u8>,
}

impl Caller {
    pub fn new() -> Self {
        Self {
            bytes: vec![UNTOUCHED; MEM_SIZE],
        }
    }

    pub fn mem(&mut self) -> FlatMemory<'_> {
        FlatMemory::new(BASE, &mut self.bytes)
    }

    pub fn addr(offset: usize) -> u64 {
        BASE + offset as u64
    }

    pub fn write_block<T: IoctlArg>(&mut self, offset: usize, block: &T) -> u64 {
        block
            .write_to(&mut self.bytes[offset..offset + T::SIZE])
            .unwrap();
        Self::addr(offset)
    }

    pub fn read_block<T: IoctlArg>(&self, offset: usize) -> T {
        T::read_from(&self.bytes[offset..offset + T::SIZE]).unwrap()
    }

    pub fn write_name(&mut self, offset: usize, name: &str) -> u64 {
        let name: VariableName = name.parse().unwrap();
        for (i, c) in name.as_slice_with_nul().iter().enumerate() {
            let at = offset + 2 * i;
            self.bytes[at..at + 2].copy_from_slice(&c.to_ne_bytes());
        }
        Self::addr(offset)
    }

    pub fn write_bytes(&mut self, offset: usize, data: &[u8]) -> u64 {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Self::addr(offset)
    }
}
