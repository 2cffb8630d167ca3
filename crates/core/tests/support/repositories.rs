use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use slotwise_core::{BookingStore, CredentialStore, ScheduleDirectory};
use slotwise_domain::{
    AccessCredential, ConfirmedBooking, Result as DomainResult, Schedule, SlotwiseError,
};

/// In-memory mock for `CredentialStore` that records every write.
#[derive(Default, Clone)]
pub struct MockCredentialStore {
    credentials: Arc<Mutex<HashMap<String, AccessCredential>>>,
    writes: Arc<Mutex<Vec<(String, AccessCredential)>>>,
    fail_reads: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockCredentialStore {
    pub fn with_credential(self, principal_id: &str, credential: AccessCredential) -> Self {
        self.credentials.lock().unwrap().insert(principal_id.to_string(), credential);
        self
    }

    pub fn failing_reads(self) -> Self {
        *self.fail_reads.lock().unwrap() = true;
        self
    }

    pub fn failing_writes(self) -> Self {
        *self.fail_writes.lock().unwrap() = true;
        self
    }

    pub fn stored(&self, principal_id: &str) -> Option<AccessCredential> {
        self.credentials.lock().unwrap().get(principal_id).cloned()
    }

    pub fn writes(&self) -> Vec<(String, AccessCredential)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn get(&self, principal_id: &str) -> DomainResult<Option<AccessCredential>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(SlotwiseError::Storage("credential table locked".into()));
        }
        Ok(self.credentials.lock().unwrap().get(principal_id).cloned())
    }

    async fn put(&self, principal_id: &str, credential: AccessCredential) -> DomainResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(SlotwiseError::Storage("disk full".into()));
        }
        self.writes.lock().unwrap().push((principal_id.to_string(), credential.clone()));
        self.credentials.lock().unwrap().insert(principal_id.to_string(), credential);
        Ok(())
    }
}

/// In-memory mock for `BookingStore`.
#[derive(Default, Clone)]
pub struct MockBookingStore {
    bookings: Arc<Mutex<Vec<ConfirmedBooking>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl MockBookingStore {
    pub fn with_booking(self, booking: ConfirmedBooking) -> Self {
        self.bookings.lock().unwrap().push(booking);
        self
    }

    pub fn unavailable(self) -> Self {
        *self.unavailable.lock().unwrap() = true;
        self
    }
}

#[async_trait]
impl BookingStore for MockBookingStore {
    async fn list_confirmed_bookings(&self, schedule_id: &str) -> DomainResult<Vec<ConfirmedBooking>> {
        if *self.unavailable.lock().unwrap() {
            return Err(SlotwiseError::Storage("bookings unavailable".into()));
        }
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|booking| booking.schedule_id == schedule_id)
            .cloned()
            .collect())
    }
}

/// In-memory mock for `ScheduleDirectory`.
#[derive(Default, Clone)]
pub struct MockScheduleDirectory {
    schedules: Arc<Mutex<HashMap<String, Schedule>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl MockScheduleDirectory {
    pub fn with_schedule(self, schedule: Schedule) -> Self {
        self.schedules.lock().unwrap().insert(schedule.id.clone(), schedule);
        self
    }

    pub fn unavailable(self) -> Self {
        *self.unavailable.lock().unwrap() = true;
        self
    }
}

#[async_trait]
impl ScheduleDirectory for MockScheduleDirectory {
    async fn resolve(&self, schedule_id: &str) -> DomainResult<Option<Schedule>> {
        if *self.unavailable.lock().unwrap() {
            return Err(SlotwiseError::Storage("directory offline".into()));
        }
        Ok(self.schedules.lock().unwrap().get(schedule_id).cloned())
    }
}
