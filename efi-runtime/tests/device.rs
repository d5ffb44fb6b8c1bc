// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use common::{Caller, FakeFirmware, BASE};
use efi_runtime::device::{
    Device, MiscRegistrar, RegistrationError, DEVICE_NAME, MISC_DYNAMIC_MINOR,
};
use efi_runtime::ioctl::{Command, GetTime, GetVariable, SetVariable};
use efi_runtime::runtime::{VariableAttributes, VariableVendor};
use efi_runtime::Gateway;
use std::thread;

#[derive(Default)]
struct Host {
    registered: Vec<(&'static str, u32)>,
    refuse_with: Option<i32>,
}

impl MiscRegistrar for Host {
    fn register(&mut self, name: &'static str, minor: u32) -> Result<(), i32> {
        if let Some(errno) = self.refuse_with {
            return Err(errno);
        }
        self.registered.push((name, minor));
        Ok(())
    }
}

#[test]
fn test_register() {
    let mut host = Host::default();
    let device = Device::register(&mut host, Gateway::new(FakeFirmware::new())).unwrap();
    assert_eq!(host.registered, [(DEVICE_NAME, MISC_DYNAMIC_MINOR)]);
    assert_eq!(device.gateway().services().calls(), 0);
}

#[test]
fn test_register_refused() {
    let mut host = Host {
        refuse_with: Some(16),
        ..Host::default()
    };
    let err = Device::register(&mut host, Gateway::new(FakeFirmware::new())).unwrap_err();
    assert_eq!(err, RegistrationError(16));
    assert_eq!(err.to_string(), "can't register efi_runtime: errno 16");
    assert!(host.registered.is_empty());
}

#[test]
fn test_sessions_are_independent() {
    let mut host = Host::default();
    let device = Device::register(&mut host, Gateway::new(FakeFirmware::new())).unwrap();

    let first = device.open();
    let second = device.open();
    let mut caller = Caller::new();

    assert_eq!(first.ioctl(&mut caller.mem(), Command::GET_TIME.0, BASE), 0);
    first.release();
    assert_eq!(second.ioctl(&mut caller.mem(), Command::GET_TIME.0, BASE), 0);
    assert_eq!(second.ioctl(&mut caller.mem(), 0x1234, BASE), -25);
    assert_eq!(second.ioctl(&mut caller.mem(), Command::GET_TIME.0, 0), -14);
    second.release();

    assert_eq!(caller.read_block::<GetTime>(0).time.year, 2023);
}

#[test]
fn test_concurrent_sessions() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 16;
    const NAME: usize = 0x100;
    const DATA: usize = 0x400;

    let attributes = VariableAttributes::BOOTSERVICE_ACCESS | VariableAttributes::RUNTIME_ACCESS;
    let vendor = VariableVendor::GLOBAL_VARIABLE.0;

    let mut host = Host::default();
    let device = Device::register(&mut host, Gateway::new(FakeFirmware::new())).unwrap();
    let session = device.open();

    thread::scope(|s| {
        for id in 0..THREADS {
            let session = session.clone();
            s.spawn(move || {
                let mut caller = Caller::new();
                let name = format!("Thread{id}");

                for round in 0..ROUNDS {
                    let value = [id as u8, round as u8];
                    let set = SetVariable {
                        variable_name: caller.write_name(NAME, &name),
                        vendor_guid: vendor,
                        attributes: attributes.bits(),
                        data_size: value.len() as u64,
                        data: caller.write_bytes(DATA, &value),
                    };
                    let arg = caller.write_block(0, &set);
                    assert_eq!(
                        session.ioctl(&mut caller.mem(), Command::SET_VARIABLE.0, arg),
                        0
                    );

                    caller.write_bytes(DATA, &[0; 2]);
                    let get = GetVariable {
                        variable_name: set.variable_name,
                        vendor_guid: vendor,
                        attributes: 0,
                        data_size: 16,
                        data: set.data,
                    };
                    let arg = caller.write_block(0, &get);
                    assert_eq!(
                        session.ioctl(&mut caller.mem(), Command::GET_VARIABLE.0, arg),
                        0
                    );
                    assert_eq!(caller.read_block::<GetVariable>(0).data_size, 2);
                    assert_eq!(&caller.bytes[DATA..DATA + 2], &value);

                    assert_eq!(
                        session.ioctl(&mut caller.mem(), Command::GET_TIME.0, BASE + 0x800),
                        0
                    );
                }
            });
        }
    });

    let firmware = device.gateway().services();
    assert_eq!(firmware.calls(), THREADS * ROUNDS * 3);
    for id in 0..THREADS {
        let (_, value) = firmware
            .variable(&format!("Thread{id}"), vendor)
            .unwrap();
        assert_eq!(value, [id as u8, (ROUNDS - 1) as u8]);
    }
}
