//! Migration rules for the database design document
//!
//! The rule set brings the design document in line with the implemented
//! schema: surrogate `id` primary keys everywhere, renamed and added
//! columns, tightened enums, and the matching fixes to COMMENT statements,
//! the ER diagram, and trigger bodies.
//!
//! Rules are declarative data; the engine applies them strictly in the
//! order declared here. Order matters: a handful of rules anchor on text a
//! prior rule produced, or deliberately overlap a prior rule to cover an
//! alternative document shape. Those carry a note.
//!
//! Inserted column lines keep the document's four-space indent; captured
//! lines are re-inserted at their own indentation.

use schemadoc_core::{RewriteRule, RuleGroup, RuleSet};

/// Replacement definition for the payments table, applied as one block
const PAYMENTS_TABLE: &str = "CREATE TABLE payments (
    id BIGSERIAL PRIMARY KEY,
    booking_id BIGINT NOT NULL REFERENCES bookings(id) ON DELETE RESTRICT,
    payment_method VARCHAR(50) NOT NULL,
    amount DECIMAL(10, 2) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
    transaction_id VARCHAR(255),
    payment_url TEXT,
    callback_data TEXT,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    paid_at TIMESTAMP,
    failed_at TIMESTAMP,
    failure_reason TEXT,

    CONSTRAINT payments_amount_positive CHECK (amount > 0),
    CONSTRAINT payments_status_valid CHECK (status IN ('PENDING', 'PROCESSING', 'COMPLETED', 'FAILED', 'REFUNDED')),
    CONSTRAINT payments_method_valid CHECK (payment_method IN ('VNPAY', 'MOMO', 'ZALOPAY', 'CASH'))
);
";

/// The full ordered rule set migrating the design document
pub fn migration_rules() -> RuleSet {
    RuleSet::new()
        .group(users())
        .group(movies())
        .group(cinemas())
        .group(halls())
        .group(seats())
        .group(shows())
        .group(show_seats())
        .group(bookings())
        .group(booking_seats())
        .group(genres())
        .group(payments())
        .group(diagram_and_triggers())
}

/// users: surrogate id, avatar_url, token_version, email CHECK removed
fn users() -> RuleGroup {
    RuleGroup::new("users")
        .rule(RewriteRule::pattern(
            "users-id-primary-key",
            r"CREATE TABLE users \(\s+user_id BIGSERIAL PRIMARY KEY,",
            "CREATE TABLE users (\n    id BIGSERIAL PRIMARY KEY,",
        ))
        .rule(RewriteRule::pattern(
            "users-avatar-url-column",
            r"(    phone_number VARCHAR\(20\),)\s+(    points INTEGER NOT NULL DEFAULT 0,)",
            "$1\n    avatar_url VARCHAR(500),\n$2",
        ))
        .rule(RewriteRule::pattern(
            "users-token-version-column",
            r"(    points INTEGER NOT NULL DEFAULT 0,)\s+(    role VARCHAR\(20\) NOT NULL DEFAULT 'CUSTOMER',)",
            "$1\n    token_version BIGINT NOT NULL DEFAULT 0,\n$2",
        ))
        .rule(RewriteRule::literal(
            "users-drop-email-format-check",
            "    CONSTRAINT users_email_format CHECK (email ~* '^[A-Za-z0-9._%-+]+@[A-Za-z0-9.-]+\\.[A-Z|a-z]{2,}$'),\n",
            "",
        ))
        .rule(RewriteRule::literal(
            "users-avatar-url-comment",
            "COMMENT ON COLUMN users.password_hash IS 'BCrypt hashed password';",
            "COMMENT ON COLUMN users.password_hash IS 'BCrypt hashed password';\nCOMMENT ON COLUMN users.avatar_url IS 'URL to user profile avatar image';",
        ))
        .rule(RewriteRule::literal(
            "users-token-version-comment",
            "COMMENT ON COLUMN users.points IS 'Loyalty points (1000 VND = 1 point)';",
            "COMMENT ON COLUMN users.points IS 'Loyalty points (1000 VND = 1 point)';\nCOMMENT ON COLUMN users.token_version IS 'Version number for JWT token invalidation';",
        ))
}

/// movies: surrogate id, cast_members, end_date, banner_url, language default
fn movies() -> RuleGroup {
    RuleGroup::new("movies")
        .rule(RewriteRule::pattern(
            "movies-id-primary-key",
            r"CREATE TABLE movies \(\s+movie_id BIGSERIAL PRIMARY KEY,",
            "CREATE TABLE movies (\n    id BIGSERIAL PRIMARY KEY,",
        ))
        .rule(RewriteRule::pattern(
            "movies-cast-members-column",
            r"(    director VARCHAR\(255\) NOT NULL,)\s+    cast TEXT,",
            "$1\n    cast_members TEXT,",
        ))
        .rule(
            RewriteRule::literal(
                "movies-drop-cast-genre-block",
                "    cast TEXT,\n    genre VARCHAR(255) NOT NULL,",
                "",
            )
            .with_note(
                "alternative-shape twin of movies-cast-members-column: fires only \
                 when cast is not directly after director, otherwise a no-op",
            ),
        )
        .rule(RewriteRule::pattern(
            "movies-end-date-column",
            r"(    duration INTEGER NOT NULL,)\s+(    release_date DATE NOT NULL,)",
            "$1\n$2\n    end_date DATE,",
        ))
        .rule(RewriteRule::literal(
            "movies-banner-url-column",
            "    poster_url VARCHAR(500),",
            "    poster_url VARCHAR(500),\n    banner_url VARCHAR(500),",
        ))
        .rule(RewriteRule::literal(
            "movies-default-language",
            "language VARCHAR(50) NOT NULL DEFAULT 'English'",
            "language VARCHAR(50) NOT NULL DEFAULT 'Vietnamese'",
        ))
        .rule(RewriteRule::literal(
            "movies-comments",
            "-- Comments\nCOMMENT ON TABLE movies IS 'Movies catalog';",
            "-- Comments\nCOMMENT ON TABLE movies IS 'Movies catalog';\nCOMMENT ON COLUMN movies.cast_members IS 'Comma-separated list of cast members';\nCOMMENT ON COLUMN movies.banner_url IS 'URL to movie banner image for headers';",
        ))
}

/// cinemas: surrogate id, opening hours default
fn cinemas() -> RuleGroup {
    RuleGroup::new("cinemas")
        .rule(RewriteRule::pattern(
            "cinemas-id-primary-key",
            r"CREATE TABLE cinemas \(\s+cinema_id BIGSERIAL PRIMARY KEY,",
            "CREATE TABLE cinemas (\n    id BIGSERIAL PRIMARY KEY,",
        ))
        .rule(RewriteRule::literal(
            "cinemas-opening-hours-default",
            "opening_hours VARCHAR(100) DEFAULT '06:00-24:00'",
            "opening_hours VARCHAR(100) DEFAULT '08:00-24:00'",
        ))
}

/// halls: surrogate id, row/seat grid instead of a JSON layout
fn halls() -> RuleGroup {
    RuleGroup::new("halls")
        .rule(RewriteRule::pattern(
            "halls-id-primary-key",
            r"CREATE TABLE halls \(\s+hall_id BIGSERIAL PRIMARY KEY,",
            "CREATE TABLE halls (\n    id BIGSERIAL PRIMARY KEY,",
        ))
        .rule(RewriteRule::pattern(
            "halls-seat-grid-columns",
            r"(    hall_type VARCHAR\(20\) NOT NULL DEFAULT 'STANDARD',)\s+(    total_seats INTEGER NOT NULL,)\s+    seat_layout JSON,\s+    screen_type VARCHAR\(50\),\s+    sound_system VARCHAR\(50\),",
            "$1\n    total_rows INTEGER NOT NULL,\n    seats_per_row INTEGER NOT NULL,\n$2",
        ))
        .rule(RewriteRule::literal(
            "halls-type-enum",
            "hall_type IN ('STANDARD', 'VIP', 'IMAX', '3D', '4DX')",
            "hall_type IN ('STANDARD', 'VIP', 'IMAX', 'THREE_D', 'FOUR_DX')",
        ))
        .rule(RewriteRule::literal(
            "halls-comments",
            "COMMENT ON COLUMN halls.seat_layout IS 'JSON structure defining rows, columns, aisles';\nCOMMENT ON COLUMN halls.hall_type IS 'STANDARD, VIP, IMAX, 3D, 4DX';",
            "COMMENT ON COLUMN halls.total_rows IS 'Number of seat rows in the hall';\nCOMMENT ON COLUMN halls.seats_per_row IS 'Number of seats per row';\nCOMMENT ON COLUMN halls.hall_type IS 'STANDARD, VIP, IMAX, THREE_D, FOUR_DX';",
        ))
}

/// seats: surrogate id, row_name, no per-seat map coordinates
fn seats() -> RuleGroup {
    RuleGroup::new("seats")
        .rule(RewriteRule::pattern(
            "seats-id-primary-key",
            r"CREATE TABLE seats \(\s+seat_id BIGSERIAL PRIMARY KEY,",
            "CREATE TABLE seats (\n    id BIGSERIAL PRIMARY KEY,",
        ))
        .rule(RewriteRule::literal(
            "seats-row-name-column",
            "    row_number VARCHAR(5) NOT NULL,",
            "    row_name VARCHAR(5) NOT NULL,",
        ))
        .rule(RewriteRule::pattern(
            "seats-drop-position-columns",
            r"(    seat_type VARCHAR\(20\) NOT NULL DEFAULT 'NORMAL',)\s+    position_x INTEGER,\s+    position_y INTEGER,",
            "$1",
        ))
        .rule(RewriteRule::literal(
            "seats-type-enum",
            "seat_type IN ('NORMAL', 'VIP', 'PREMIUM', 'COUPLE')",
            "seat_type IN ('NORMAL', 'VIP', 'COUPLE')",
        ))
        .rule(RewriteRule::literal(
            "seats-unique-constraint",
            "UNIQUE (hall_id, row_number, seat_number)",
            "UNIQUE (hall_id, row_name, seat_number)",
        ))
        .rule(RewriteRule::literal(
            "seats-unique-index",
            "CREATE UNIQUE INDEX idx_seats_unique_position ON seats(hall_id, row_number, seat_number);",
            "CREATE UNIQUE INDEX idx_seats_unique_position ON seats(hall_id, row_name, seat_number);",
        ))
        .rule(RewriteRule::literal(
            "seats-comments",
            "COMMENT ON COLUMN seats.seat_type IS 'NORMAL, VIP, PREMIUM, COUPLE';\nCOMMENT ON COLUMN seats.position_x IS 'X coordinate for seat map visualization';\nCOMMENT ON COLUMN seats.position_y IS 'Y coordinate for seat map visualization';",
            "COMMENT ON COLUMN seats.row_name IS 'Row identifier (A, B, C, etc.)';\nCOMMENT ON COLUMN seats.seat_type IS 'NORMAL, VIP, COUPLE';",
        ))
}

/// shows: surrogate id, explicit start and end times
fn shows() -> RuleGroup {
    RuleGroup::new("shows")
        .rule(RewriteRule::pattern(
            "shows-id-primary-key",
            r"CREATE TABLE shows \(\s+show_id BIGSERIAL PRIMARY KEY,",
            "CREATE TABLE shows (\n    id BIGSERIAL PRIMARY KEY,",
        ))
        .rule(RewriteRule::pattern(
            "shows-start-end-time-columns",
            r"(    show_date DATE NOT NULL,)\s+    show_time TIME NOT NULL,",
            "$1\n    start_time TIME NOT NULL,\n    end_time TIME NOT NULL,",
        ))
        .rule(RewriteRule::literal(
            "shows-comments",
            "COMMENT ON COLUMN shows.status IS 'SCHEDULED, ONGOING, COMPLETED, CANCELLED';",
            "COMMENT ON COLUMN shows.start_time IS 'Show start time';\nCOMMENT ON COLUMN shows.end_time IS 'Show end time (calculated from start_time + movie duration)';\nCOMMENT ON COLUMN shows.status IS 'SCHEDULED, ONGOING, COMPLETED, CANCELLED';",
        ))
}

fn show_seats() -> RuleGroup {
    RuleGroup::new("show_seats").rule(RewriteRule::pattern(
        "show-seats-id-primary-key",
        r"CREATE TABLE show_seats \(\s+show_seat_id BIGSERIAL PRIMARY KEY,",
        "CREATE TABLE show_seats (\n    id BIGSERIAL PRIMARY KEY,",
    ))
}

/// bookings: surrogate id plus booking_code, expiry/confirmation lifecycle,
/// refund columns removed
fn bookings() -> RuleGroup {
    RuleGroup::new("bookings")
        .rule(RewriteRule::pattern(
            "bookings-id-and-code",
            r"CREATE TABLE bookings \(\s+booking_id BIGSERIAL PRIMARY KEY,",
            "CREATE TABLE bookings (\n    id BIGSERIAL PRIMARY KEY,\n    booking_code VARCHAR(20) NOT NULL UNIQUE,",
        ))
        .rule(RewriteRule::pattern(
            "bookings-expiry-confirmation-columns",
            r"(    qr_code TEXT,)\s+(    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,)\s+    paid_at TIMESTAMP,",
            "$1\n    expires_at TIMESTAMP,\n$2\n    confirmed_at TIMESTAMP,",
        ))
        .rule(RewriteRule::pattern(
            "bookings-drop-refund-columns",
            r"    cancelled_at TIMESTAMP,\s+    refund_id VARCHAR\(255\),\s+    refunded_at TIMESTAMP,\s+    notes TEXT,",
            "    cancelled_at TIMESTAMP,",
        ))
        .rule(RewriteRule::literal(
            "bookings-status-enum",
            "status IN ('PENDING', 'CONFIRMED', 'CANCELLED', 'FAILED', 'REFUNDED')",
            "status IN ('PENDING', 'CONFIRMED', 'CANCELLED', 'EXPIRED')",
        ))
        .rule(
            RewriteRule::pattern(
                "bookings-payment-consistency-check",
                r"CONSTRAINT bookings_payment_consistency CHECK \(\s+\(status = 'CONFIRMED' AND paid_at IS NOT NULL\) OR\s+\(status != 'CONFIRMED'\)\s+\),",
                "CONSTRAINT bookings_payment_consistency CHECK (\n        (status = 'CONFIRMED' AND confirmed_at IS NOT NULL) OR\n        (status != 'CONFIRMED')\n    ),",
            )
            .with_note(
                "pairs with bookings-expiry-confirmation-columns, which renames \
                 the paid_at column this CHECK used to reference",
            ),
        )
        .rule(RewriteRule::literal(
            "bookings-confirmed-at-index",
            "CREATE INDEX idx_bookings_paid_at ON bookings(paid_at);",
            "CREATE INDEX idx_bookings_confirmed_at ON bookings(confirmed_at);",
        ))
        .rule(RewriteRule::literal(
            "bookings-comments",
            "COMMENT ON COLUMN bookings.status IS 'PENDING, CONFIRMED, CANCELLED, FAILED, REFUNDED';",
            "COMMENT ON COLUMN bookings.booking_code IS 'Unique booking reference code';\nCOMMENT ON COLUMN bookings.expires_at IS 'Expiration time for pending bookings';\nCOMMENT ON COLUMN bookings.status IS 'PENDING, CONFIRMED, CANCELLED, EXPIRED';",
        ))
}

fn booking_seats() -> RuleGroup {
    RuleGroup::new("booking_seats").rule(RewriteRule::pattern(
        "booking-seats-id-primary-key",
        r"CREATE TABLE booking_seats \(\s+booking_seat_id BIGSERIAL PRIMARY KEY,",
        "CREATE TABLE booking_seats (\n    id BIGSERIAL PRIMARY KEY,",
    ))
}

fn genres() -> RuleGroup {
    RuleGroup::new("genres").rule(RewriteRule::pattern(
        "genres-id-primary-key",
        r"CREATE TABLE genres \(\s+genre_id SERIAL PRIMARY KEY,",
        "CREATE TABLE genres (\n    id SERIAL PRIMARY KEY,",
    ))
}

/// payments: the whole definition is replaced in one block
fn payments() -> RuleGroup {
    RuleGroup::new("payments")
        .rule(
            RewriteRule::pattern(
                "payments-table-rewrite",
                r"(?s)CREATE TABLE payments \(\s+payment_id BIGSERIAL PRIMARY KEY,.*?\n-- Indexes",
                format!("{PAYMENTS_TABLE}\n-- Indexes"),
            )
            .with_note(
                "replaces everything from the table header to the -- Indexes \
                 marker with the definition as implemented; the old provider, \
                 currency, gateway and refund columns are dropped",
            ),
        )
        .rule(RewriteRule::literal(
            "payments-comments",
            "-- Comments\nCOMMENT ON TABLE payments IS 'Payment transactions for bookings';\nCOMMENT ON COLUMN payments.payment_method IS 'VNPAY, MOMO, ZALOPAY, CARD, CASH, BANK_TRANSFER';\nCOMMENT ON COLUMN payments.payment_provider IS 'Payment gateway: VNPAY, MOMO, ZALOPAY, STRIPE, INTERNAL';",
            "-- Comments\nCOMMENT ON TABLE payments IS 'Payment transactions for bookings';\nCOMMENT ON COLUMN payments.payment_method IS 'Payment method: VNPAY, MOMO, ZALOPAY, CASH';\nCOMMENT ON COLUMN payments.callback_data IS 'Payment gateway callback data as TEXT';\nCOMMENT ON COLUMN payments.failed_at IS 'Timestamp when payment failed';\nCOMMENT ON COLUMN payments.failure_reason IS 'Reason for payment failure';",
        ))
}

/// Free-standing fixes: ER diagram labels and trigger bodies
fn diagram_and_triggers() -> RuleGroup {
    RuleGroup::new("diagram and triggers")
        .rule(RewriteRule::literal(
            "diagram-users-pk-label",
            "│ PK: user_id  │",
            "│ PK: id       │",
        ))
        .rule(RewriteRule::literal(
            "diagram-movies-pk-label",
            "│ PK: movie_id│",
            "│ PK: id      │",
        ))
        .rule(
            RewriteRule::literal(
                "diagram-fk-labels-keep",
                "│ FK: movie_id│",
                "│ FK: movie_id│",
            )
            .with_note("FK labels keep the referencing column names"),
        )
        .rule(
            RewriteRule::pattern(
                "trigger-show-seat-references",
                r"INSERT INTO show_seats \(show_id, seat_id, price, status\)\s+VALUES \(NEW\.show_id, seat_record\.seat_id",
                "INSERT INTO show_seats (show_id, seat_id, price, status)\n        VALUES (NEW.id, seat_record.id",
            )
            .with_note(
                "NEW.id and seat_record.id exist because the shows and seats \
                 groups renamed those primary keys",
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruleset_shape() {
        let rules = migration_rules();
        assert_eq!(rules.groups.len(), 12);
        assert_eq!(rules.len(), 45);

        let group_names: Vec<_> = rules.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            group_names,
            vec![
                "users",
                "movies",
                "cinemas",
                "halls",
                "seats",
                "shows",
                "show_seats",
                "bookings",
                "booking_seats",
                "genres",
                "payments",
                "diagram and triggers",
            ]
        );
    }

    #[test]
    fn rule_names_are_unique() {
        let rules = migration_rules();
        let mut names: Vec<_> = rules.iter().map(|(_, r)| r.name.clone()).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn payments_block_ends_before_indexes_marker() {
        // The block replacement restores the marker it consumes
        let rules = migration_rules();
        let (_, rule) = rules
            .iter()
            .find(|(_, r)| r.name == "payments-table-rewrite")
            .unwrap();
        assert!(rule.replacement.ends_with(");\n\n-- Indexes"));
    }
}
