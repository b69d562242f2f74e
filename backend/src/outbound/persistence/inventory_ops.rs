//! In-transaction inventory operations shared by the shop and feed paths.
//!
//! Food stacks; character ownership is binary. A stack that reaches zero is
//! deleted so `quantity >= 1` holds for every surviving row.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::catalog::{InventoryEntry, ItemKind};

use super::error_mapping::TxError;
use super::models::{InventoryRow, NewInventoryRow};
use super::schema::user_inventory;

/// Grant `quantity` units of an item.
///
/// Foods increment an existing stack; characters insert once and are a
/// no-op when already owned.
pub(crate) async fn add_item_in_tx(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    kind: ItemKind,
    item_id: Uuid,
    quantity: i32,
) -> Result<(), TxError> {
    let row = NewInventoryRow {
        id: Uuid::new_v4(),
        user_id,
        item_type: kind.as_str().to_owned(),
        item_id,
        quantity,
    };
    let conflict_target = (
        user_inventory::user_id,
        user_inventory::item_type,
        user_inventory::item_id,
    );

    match kind {
        ItemKind::Food => {
            diesel::insert_into(user_inventory::table)
                .values(row)
                .on_conflict(conflict_target)
                .do_update()
                .set(user_inventory::quantity.eq(user_inventory::quantity + quantity))
                .execute(conn)
                .await?;
        }
        ItemKind::Character => {
            diesel::insert_into(user_inventory::table)
                .values(row)
                .on_conflict(conflict_target)
                .do_nothing()
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

/// Remove `quantity` units, deleting the row when it reaches zero.
///
/// Fails with `Missing("inventory entry")` when nothing is owned and
/// `InsufficientQuantity` when the stack is too small; callers map those
/// to their port's vocabulary.
pub(crate) async fn consume_in_tx(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    kind: ItemKind,
    item_id: Uuid,
    quantity: i32,
) -> Result<(), TxError> {
    let row: Option<InventoryRow> = user_inventory::table
        .filter(
            user_inventory::user_id
                .eq(user_id)
                .and(user_inventory::item_type.eq(kind.as_str()))
                .and(user_inventory::item_id.eq(item_id)),
        )
        .select(InventoryRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;

    let row = row.ok_or(TxError::Missing("inventory entry"))?;
    if row.quantity < quantity {
        return Err(TxError::InsufficientQuantity {
            have: row.quantity,
            need: quantity,
        });
    }

    if row.quantity == quantity {
        diesel::delete(user_inventory::table.filter(user_inventory::id.eq(row.id)))
            .execute(conn)
            .await?;
    } else {
        diesel::update(user_inventory::table.filter(user_inventory::id.eq(row.id)))
            .set(user_inventory::quantity.eq(row.quantity - quantity))
            .execute(conn)
            .await?;
    }
    Ok(())
}

pub(crate) fn inventory_from_row(row: InventoryRow) -> Result<InventoryEntry, TxError> {
    let item_kind: ItemKind = row
        .item_type
        .parse()
        .map_err(|err| TxError::corrupt(format!("inventory: {err}")))?;
    Ok(InventoryEntry {
        id: row.id,
        user_id: row.user_id,
        item_kind,
        item_id: row.item_id,
        quantity: row.quantity,
        acquired_at: row.acquired_at,
    })
}
