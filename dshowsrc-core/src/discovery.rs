use crate::builder::FilterQuery;
use crate::error::{DshowError, Result};
use crate::guid::Guid;
use crate::traits::{DeviceEnumerator, DeviceInfo, Filter, FilterMapper, Moniker, Pin, PinDirection};

/// First pin of `filter` whose direction is `direction`.
///
/// Pins whose direction cannot be queried are skipped. Every pin that is not
/// returned is released before this function returns.
pub fn pin_from_filter<F: Filter>(filter: &F, direction: PinDirection) -> Result<F::Pin> {
    filter
        .pins()?
        .find(|pin| matches!(pin.direction(), Ok(d) if d == direction))
        .ok_or(DshowError::NoMatchingPin)
}

/// Picks a registered filter that converts the query's input types into its
/// output types.
///
/// Without a preferred name the first match that can be instantiated wins and
/// enumeration stops there. With one, every instantiated match replaces the
/// previous candidate until a filter whose friendly name contains the
/// preference (case-insensitively) turns up; if none does, the last match is
/// returned. An empty preference matches any filter that reports a name.
pub fn find_filter<M: FilterMapper>(
    mapper: &M,
    query: &FilterQuery,
) -> Result<Option<<M::Moniker as Moniker>::Filter>> {
    let preferred = query.preferred_name.as_deref().map(str::to_uppercase);
    let mut selected = None;

    for moniker in mapper.matching_filters(query)? {
        let friendly_name = moniker.friendly_name().map(|name| name.to_uppercase());
        let Ok(filter) = moniker.bind_filter() else {
            continue;
        };
        // 替换时旧的候选会被释放
        selected = Some(filter);

        let Some(preferred) = preferred.as_deref() else {
            tracing::debug!(target: "dshowsrc::core", "Using first matching filter {:?}", friendly_name);
            break;
        };
        if friendly_name.as_deref().is_some_and(|name| name.contains(preferred)) {
            tracing::debug!(target: "dshowsrc::core", "Found preferred filter {:?}", friendly_name);
            break;
        }
    }

    Ok(selected)
}

/// Whether at least one registered filter handles the query's conversion.
/// Stops at the first match that can be instantiated.
pub fn supports_transform<M: FilterMapper>(mapper: &M, query: &FilterQuery) -> Result<bool> {
    Ok(mapper
        .matching_filters(query)?
        .any(|moniker| moniker.bind_filter().is_ok()))
}

/// Finds a device of `category` by friendly name and returns its moniker
/// display name.
///
/// An empty `device_name` selects the first device that reports a friendly
/// name; the name actually matched is returned alongside the path. Names are
/// compared case-insensitively. Enumeration stops at the first match, even
/// if its display name cannot be read.
pub fn device_path_from_name<E: DeviceEnumerator>(
    enumerator: &E,
    category: &Guid,
    device_name: &str,
) -> Result<Option<DeviceInfo>> {
    let mut target = (!device_name.is_empty()).then(|| device_name.to_string());

    for moniker in enumerator.class_enumerator(category)? {
        let Some(friendly_name) = moniker.friendly_name() else {
            continue;
        };
        let target = target.get_or_insert_with(|| friendly_name.clone());

        if target.to_lowercase() == friendly_name.to_lowercase() {
            let path = moniker.display_name().ok();
            tracing::debug!(target: "dshowsrc::core", "Device {} -> {:?}", friendly_name, path);
            return Ok(path.map(|id| DeviceInfo {
                name: friendly_name,
                id,
            }));
        }
    }

    Ok(None)
}

/// Every device of `category` that has both a friendly name and a display
/// name, in enumeration order.
pub fn list_devices<E: DeviceEnumerator>(enumerator: &E, category: &Guid) -> Result<Vec<DeviceInfo>> {
    Ok(enumerator
        .class_enumerator(category)?
        .filter_map(|moniker| {
            let name = moniker.friendly_name()?;
            let id = moniker.display_name().ok()?;
            Some(DeviceInfo { name, id })
        })
        .collect())
}

/// Instantiates the device of `category` whose display name is `path`.
pub fn open_device<E: DeviceEnumerator>(
    enumerator: &E,
    category: &Guid,
    path: &str,
) -> Result<<E::Moniker as Moniker>::Filter> {
    enumerator
        .class_enumerator(category)?
        .find(|moniker| moniker.display_name().is_ok_and(|id| id == path))
        .ok_or_else(|| DshowError::Com(format!("device not found: {}", path)))?
        .bind_filter()
}
