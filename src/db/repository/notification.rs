use rusqlite::{params, Connection};

use super::{format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::{NewNotification, Notification};

pub fn insert_notification(
    conn: &Connection,
    notification: &NewNotification,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (user_id, title, message, read, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            notification.user_id,
            notification.title,
            notification.message,
            notification.read,
            format_timestamp(&notification.timestamp),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Every notification for one user, newest first.
pub fn list_notifications_for_user(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<Notification>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, message, read, timestamp
         FROM notifications WHERE user_id = ?1
         ORDER BY timestamp DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, bool>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut notifications = Vec::new();
    for row in rows {
        let (id, user_id, title, message, read, timestamp) = row?;
        notifications.push(Notification {
            id,
            user_id,
            title,
            message,
            read,
            timestamp: parse_timestamp(&timestamp)?,
        });
    }
    Ok(notifications)
}
