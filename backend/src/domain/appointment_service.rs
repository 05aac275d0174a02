use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::{now_epoch_millis, now_rfc3339, publish_change, EventSender};
use crate::storage::DbConnection;
use shared::{
    parse_date_key, Appointment, AppointmentListResponse, AppointmentResponse, ChangeOp,
    ChangeTable, CreateAppointmentRequest,
};

/// Service for managing calendar appointments
#[derive(Clone)]
pub struct AppointmentService {
    db: Arc<DbConnection>,
    events: EventSender,
}

impl AppointmentService {
    /// Create a new AppointmentService
    pub fn new(db: Arc<DbConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Create a new appointment
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse> {
        info!(
            "Creating appointment: title={}, date={}, time={}",
            request.title, request.date, request.time
        );

        self.validate_create_request(&request)?;

        let appointment = Appointment {
            id: Appointment::generate_id(now_epoch_millis()),
            date: request.date,
            time: request.time,
            title: request.title.trim().to_string(),
            client: request.client.trim().to_string(),
            notes: request.notes,
            created_at: now_rfc3339(),
        };

        self.db.store_appointment(&appointment).await?;

        publish_change(
            &self.events,
            ChangeTable::Appointments,
            ChangeOp::Created,
            &appointment.id,
            serde_json::to_value(&appointment).ok(),
        );

        info!("Created appointment {} on {}", appointment.id, appointment.date);

        Ok(AppointmentResponse {
            appointment,
            success_message: "Appointment saved".to_string(),
        })
    }

    /// List all appointments in insertion order
    pub async fn list_appointments(&self) -> Result<AppointmentListResponse> {
        let appointments = self.db.list_appointments().await?;
        Ok(AppointmentListResponse { appointments })
    }

    /// List appointments inside a date-key window (inclusive)
    pub async fn list_in_range(&self, start: &str, end: &str) -> Result<Vec<Appointment>> {
        self.db.list_appointments_in_range(start, end).await
    }

    fn validate_create_request(&self, request: &CreateAppointmentRequest) -> Result<()> {
        if request.title.trim().is_empty() {
            return Err(anyhow::anyhow!("Appointment title cannot be empty"));
        }

        if parse_date_key(&request.date).is_none() {
            return Err(anyhow::anyhow!(
                "Appointment date must be in YYYY-MM-DD format"
            ));
        }

        self.validate_time(&request.time)
    }

    /// Time of day must be HH:MM, 24-hour
    fn validate_time(&self, time: &str) -> Result<()> {
        let parts: Vec<&str> = time.split(':').collect();
        if parts.len() != 2 || parts[0].len() != 2 || parts[1].len() != 2 {
            return Err(anyhow::anyhow!("Appointment time must be in HH:MM format"));
        }

        let hour: u32 = parts[0]
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid hour in appointment time"))?;
        let minute: u32 = parts[1]
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid minute in appointment time"))?;

        if hour > 23 {
            return Err(anyhow::anyhow!("Hour must be between 00 and 23"));
        }
        if minute > 59 {
            return Err(anyhow::anyhow!("Minute must be between 00 and 59"));
        }

        Ok(())
    }
}
