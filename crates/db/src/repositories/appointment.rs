use crate::models::DbAppointment;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::Result;
use slotbook_core::models::appointment::Appointment;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const COLUMNS: &str =
    "id, name, email, phone, reason, start_time, end_time, cancelled, owner_ref, created_at";

pub async fn insert_appointment(pool: &Pool<Postgres>, appointment: &Appointment) -> Result<DbAppointment> {
    tracing::debug!(
        "Inserting appointment: id={}, start={}",
        appointment.id, appointment.start_time
    );

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments (id, name, email, phone, reason, start_time, end_time, cancelled, owner_ref, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(appointment.id)
    .bind(&appointment.name)
    .bind(&appointment.email)
    .bind(&appointment.phone)
    .bind(&appointment.reason)
    .bind(appointment.start_time)
    .bind(appointment.end_time)
    .bind(appointment.owner_ref.as_str())
    .bind(appointment.created_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment by id: {}", id);

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Reads an appointment and holds its row lock until the transaction ends.
pub async fn lock_appointment(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbAppointment>> {
    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE id = $1
        FOR UPDATE
        "#
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

pub async fn update_appointment(conn: &mut PgConnection, appointment: &Appointment) -> Result<DbAppointment> {
    tracing::debug!(
        "Updating appointment: id={}, start={}",
        appointment.id, appointment.start_time
    );

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET name = $2, email = $3, phone = $4, reason = $5, start_time = $6, end_time = $7
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(appointment.id)
    .bind(&appointment.name)
    .bind(&appointment.email)
    .bind(&appointment.phone)
    .bind(&appointment.reason)
    .bind(appointment.start_time)
    .bind(appointment.end_time)
    .fetch_one(conn)
    .await?;

    Ok(row)
}

/// Sets `cancelled`. Returns `None` when the id is unknown; an already
/// cancelled row is returned unchanged.
pub async fn cancel_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET cancelled = TRUE
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn search_appointments(
    pool: &Pool<Postgres>,
    needle: &str,
    on_date: Option<NaiveDate>,
    include_cancelled: bool,
) -> Result<Vec<DbAppointment>> {
    let pattern = format!("%{}%", escape_like(needle));
    let (day_start, day_end) = match on_date {
        Some(day) => {
            let start = day.and_time(NaiveTime::MIN).and_utc();
            (Some(start), Some(start + chrono::Duration::days(1)))
        }
        None => (None, None),
    };

    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE (name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1 OR reason ILIKE $1)
          AND ($2 OR NOT cancelled)
          AND ($3::timestamptz IS NULL OR start_time >= $3)
          AND ($4::timestamptz IS NULL OR start_time < $4)
        ORDER BY cancelled ASC, LOWER(name) ASC, start_time ASC
        "#
    ))
    .bind(pattern)
    .bind(include_cancelled)
    .bind(day_start)
    .bind(day_end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_appointments_in_range(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    include_cancelled: bool,
) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE start_time >= $1 AND start_time < $2
          AND ($3 OR NOT cancelled)
        ORDER BY start_time ASC, cancelled ASC
        "#
    ))
    .bind(from)
    .bind(to)
    .bind(include_cancelled)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_appointments(pool: &Pool<Postgres>, include_cancelled: bool) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE ($1 OR NOT cancelled)
        ORDER BY start_time ASC, cancelled ASC
        "#
    ))
    .bind(include_cancelled)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Escapes `LIKE` wildcards so user text is matched literally.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
