//! Owned bus handle with an explicit open/close lifecycle.
//!
//! The handle replaces process-wide "already open" state: whoever owns the
//! [`BusHandle`] owns the bus. It is not internally synchronized; callers sharing one
//! bus between threads must serialize access themselves, e.g. behind a mutex.

use crate::error::{Error, Result};
use crate::interface::{Operation, SigmaDspInterface};
use crate::log::debug;
use crate::params::DeviceAddress;

/// Open or closed handle to a bus interface.
pub struct BusHandle<IFACE> {
    interface: Option<IFACE>,
}

impl<IFACE> BusHandle<IFACE> {
    /// Wraps an already opened interface.
    pub const fn new(interface: IFACE) -> Self {
        Self {
            interface: Some(interface),
        }
    }

    /// Creates a handle with no interface attached yet.
    pub const fn closed() -> Self {
        Self { interface: None }
    }

    /// Opens the bus with `connect` unless the handle is already open.
    ///
    /// A second call while open is a successful no-op and `connect` is not invoked.
    pub fn open_with<F, E>(&mut self, connect: F) -> core::result::Result<(), E>
    where
        F: FnOnce() -> core::result::Result<IFACE, E>,
    {
        if self.interface.is_none() {
            self.interface = Some(connect()?);
            debug!("bus opened");
        }

        Ok(())
    }

    /// Releases the interface, returning it if the handle was open.
    ///
    /// Closing an already closed handle is a no-op.
    pub fn close(&mut self) -> Option<IFACE> {
        let interface = self.interface.take();
        if interface.is_some() {
            debug!("bus closed");
        }
        interface
    }

    /// Returns `true` while an interface is attached.
    pub fn is_open(&self) -> bool {
        self.interface.is_some()
    }

    /// Provides mutable access to the open interface.
    pub fn interface_mut(&mut self) -> Option<&mut IFACE> {
        self.interface.as_mut()
    }
}

impl<IFACE> Default for BusHandle<IFACE> {
    fn default() -> Self {
        Self::closed()
    }
}

impl<IFACE, CommE> BusHandle<IFACE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    /// Submits one atomic transaction, failing with [`Error::Closed`] when not open.
    pub fn submit(
        &mut self,
        address: DeviceAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), CommE> {
        let interface = self.interface.as_mut().ok_or(Error::Closed)?;
        interface.submit(address, operations).map_err(Error::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::BusHandle;
    use crate::error::Error;
    use crate::interface::{Operation, SigmaDspInterface};
    use crate::params::DeviceAddress;
    use core::convert::Infallible;

    struct CountingInterface {
        submissions: usize,
    }

    impl SigmaDspInterface for CountingInterface {
        type Error = Infallible;

        fn submit(
            &mut self,
            _address: DeviceAddress,
            _operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.submissions += 1;
            Ok(())
        }
    }

    #[test]
    fn open_is_idempotent() {
        let mut bus = BusHandle::closed();
        let mut connects = 0;

        for _ in 0..2 {
            bus.open_with(|| {
                connects += 1;
                Ok::<_, ()>(CountingInterface { submissions: 0 })
            })
            .unwrap();
        }

        assert!(bus.is_open());
        assert_eq!(connects, 1);
    }

    #[test]
    fn open_failure_leaves_handle_closed() {
        let mut bus = BusHandle::<CountingInterface>::closed();
        assert_eq!(bus.open_with(|| Err("no device")), Err("no device"));
        assert!(!bus.is_open());
    }

    #[test]
    fn close_twice_is_a_no_op() {
        let mut bus = BusHandle::new(CountingInterface { submissions: 0 });
        assert!(bus.close().is_some());
        assert!(bus.close().is_none());
        assert!(!bus.is_open());
    }

    #[test]
    fn submit_after_close_is_rejected() {
        let mut bus = BusHandle::new(CountingInterface { submissions: 0 });
        let address = DeviceAddress::default();

        bus.submit(address, &mut [Operation::Write(&[0x00])]).unwrap();
        let interface = bus.close().unwrap();
        assert_eq!(interface.submissions, 1);

        let result = bus.submit(address, &mut [Operation::Write(&[0x00])]);
        assert_eq!(result, Err(Error::Closed));
    }
}
