#[cfg(test)]
mod tests {
    use crate::logic::{filter_free_slots, generate_slots, BusyInterval, ConflictPolicy, TimeSlot};
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
    use proptest::prelude::*;

    // Helper producing a fixed offset on the quarter hour, between -12:00 and +14:00
    fn offset_from_quarters(quarters: i32) -> FixedOffset {
        FixedOffset::east_opt(quarters * 15 * 60).unwrap()
    }

    fn base_date(day_of_year: u32) -> NaiveDate {
        NaiveDate::from_yo_opt(2024, day_of_year).unwrap()
    }

    fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
        offset
            .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            .unwrap()
    }

    // Busy entries on the hour, spread over the generated days
    fn busy_from_hours(
        date: NaiveDate,
        offset: FixedOffset,
        hour_offsets: &[i64],
    ) -> Vec<BusyInterval> {
        hour_offsets
            .iter()
            .map(|h| BusyInterval {
                start: local_midnight(date, offset) + Duration::hours(*h),
                end: None,
            })
            .collect()
    }

    proptest! {
        // Count is days times hours, ordered strictly, every slot on the hour
        #[test]
        fn test_grid_shape(
            day_of_year in 1..360u32,
            num_days in 0..15u32,
            start_hour in 0..24u32,
            end_hour in 0..25u32,
            quarters in -48..56i32,
        ) {
            let offset = offset_from_quarters(quarters);
            let grid = generate_slots(base_date(day_of_year), num_days, start_hour, end_hour, offset);

            let per_day = end_hour.saturating_sub(start_hour) as usize;
            prop_assert_eq!(grid.len(), num_days as usize * per_day);
            prop_assert!(grid.windows(2).all(|w| w[0] < w[1]));
            for slot in &grid {
                prop_assert!(slot.hour() >= start_hour && slot.hour() < end_hour);
                prop_assert_eq!(slot.offset(), offset);
            }
        }

        // The free list is an ordered subset of the grid, all after now, all on the date
        #[test]
        fn test_free_slots_subset(
            day_of_year in 1..350u32,
            num_days in 1..8u32,
            target_day in 0..8u32,
            now_hours in 0..200i64,
            busy_hours in proptest::collection::vec(0..200i64, 0..12),
            quarters in -48..56i32,
            overlap in any::<bool>(),
        ) {
            let offset = offset_from_quarters(quarters);
            let start = base_date(day_of_year);
            let grid = generate_slots(start, num_days, 9, 15, offset);
            let busy = busy_from_hours(start, offset, &busy_hours);
            let now = local_midnight(start, offset) + Duration::hours(now_hours);
            let date = start + Duration::days(i64::from(target_day));
            let policy = if overlap { ConflictPolicy::Overlap } else { ConflictPolicy::ExactStart };

            let free = filter_free_slots(&grid, &busy, now, date, policy);

            prop_assert!(free.windows(2).all(|w| w[0] < w[1]));
            for slot in &free {
                prop_assert!(grid.contains(slot));
                prop_assert!(slot.instant() > now);
                prop_assert_eq!(slot.date(), date);
                prop_assert!(busy.iter().all(|b| b.start != slot.instant()));
            }
        }

        // Filtering the result again changes nothing
        #[test]
        fn test_filter_idempotent(
            now_hours in 0..170i64,
            busy_hours in proptest::collection::vec(0..170i64, 0..10),
            target_day in 0..7u32,
        ) {
            let offset = offset_from_quarters(20);
            let start = base_date(2);
            let grid = generate_slots(start, 7, 9, 15, offset);
            let busy = busy_from_hours(start, offset, &busy_hours);
            let now = local_midnight(start, offset) + Duration::hours(now_hours);
            let date = start + Duration::days(i64::from(target_day));

            let once = filter_free_slots(&grid, &busy, now, date, ConflictPolicy::ExactStart);
            let twice = filter_free_slots(&once, &busy, now, date, ConflictPolicy::ExactStart);

            prop_assert_eq!(once, twice);
        }

        // Overlap never frees a slot that exact-start matching excludes
        #[test]
        fn test_overlap_is_stricter(
            now_hours in 0..48i64,
            busy_hours in proptest::collection::vec(0..48i64, 0..10),
            busy_length in 1..5i64,
        ) {
            let offset = offset_from_quarters(20);
            let start = base_date(100);
            let grid = generate_slots(start, 2, 9, 15, offset);
            let busy: Vec<BusyInterval> = busy_from_hours(start, offset, &busy_hours)
                .into_iter()
                .map(|b| BusyInterval { end: Some(b.start + Duration::hours(busy_length)), ..b })
                .collect();
            let now = local_midnight(start, offset) + Duration::hours(now_hours);

            let exact: Vec<TimeSlot> = filter_free_slots(&grid, &busy, now, start, ConflictPolicy::ExactStart);
            let overlap = filter_free_slots(&grid, &busy, now, start, ConflictPolicy::Overlap);

            prop_assert!(overlap.iter().all(|slot| exact.contains(slot)));
        }
    }
}
