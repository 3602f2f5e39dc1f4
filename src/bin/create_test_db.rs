use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{
    Month,
    macros::{date, datetime},
};

use masjid_admin::{
    BookingStatus, BookingWindow, Direction, NewBooking, NewRoom, NewTransaction, create_booking,
    create_room, create_transaction, initialize_db, set_booking_status, set_opening_balance,
};

/// A utility for creating a test database for the masjid_admin web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating rooms...");
    let aula = create_room(
        NewRoom {
            name: "Aula Utama".to_owned(),
            capacity: 500,
            rental_rate: 2_500_000,
            available_for_rent: true,
            rules: "Dilarang merokok. Jaga kebersihan.".to_owned(),
            facilities: "AC, Sound System, Proyektor".to_owned(),
        },
        &conn,
    )?;
    create_room(
        NewRoom {
            name: "Ruang Rapat".to_owned(),
            capacity: 30,
            rental_rate: 500_000,
            available_for_rent: true,
            rules: "Maksimal 30 orang.".to_owned(),
            facilities: "AC, Meja Rapat, Whiteboard".to_owned(),
        },
        &conn,
    )?;
    let kelas_1 = create_room(
        NewRoom {
            name: "Ruang Kelas 1".to_owned(),
            capacity: 40,
            rental_rate: 300_000,
            available_for_rent: true,
            rules: String::new(),
            facilities: "Kipas Angin, Papan Tulis".to_owned(),
        },
        &conn,
    )?;
    create_room(
        NewRoom {
            name: "Ruang Kelas 2".to_owned(),
            capacity: 40,
            rental_rate: 300_000,
            available_for_rent: true,
            rules: String::new(),
            facilities: "Kipas Angin, Papan Tulis".to_owned(),
        },
        &conn,
    )?;

    println!("Creating bookings...");
    create_booking(
        NewBooking {
            room_id: aula.id,
            renter: "PT ABC Indonesia".to_owned(),
            phone: "081234567890".to_owned(),
            window: BookingWindow::new(datetime!(2026-02-15 08:00), datetime!(2026-02-15 17:00))?,
            purpose: "Seminar Ekonomi Syariah".to_owned(),
            notes: String::new(),
            total_cost: 2_500_000,
        },
        &conn,
    )?;

    let xyz = create_booking(
        NewBooking {
            room_id: kelas_1.id,
            renter: "Yayasan Pendidikan XYZ".to_owned(),
            phone: "082198765432".to_owned(),
            window: BookingWindow::new(datetime!(2026-02-20 09:00), datetime!(2026-02-22 15:00))?,
            purpose: "Pelatihan Guru".to_owned(),
            notes: String::new(),
            total_cost: 900_000,
        },
        &conn,
    )?;
    set_booking_status(xyz.id, BookingStatus::Approved, Some("Sudah DP 50%"), &conn)?;

    let pemuda = create_booking(
        NewBooking {
            room_id: aula.id,
            renter: "Komunitas Pemuda".to_owned(),
            phone: "085611223344".to_owned(),
            window: BookingWindow::new(datetime!(2026-02-10 19:00), datetime!(2026-02-10 22:00))?,
            purpose: "Malam Keakraban".to_owned(),
            notes: String::new(),
            total_cost: 0,
        },
        &conn,
    )?;
    set_booking_status(
        pemuda.id,
        BookingStatus::Rejected,
        Some("Bentrok dengan kajian rutin"),
        &conn,
    )?;

    println!("Creating transactions...");
    let transactions = [
        (
            date!(2026 - 02 - 03),
            "Donasi",
            "Donasi hamba Allah",
            1_750_000,
            Direction::Income,
            "Bendahara",
        ),
        (
            date!(2026 - 02 - 04),
            "Perlengkapan",
            "Pembelian karpet baru",
            4_500_000,
            Direction::Expense,
            "Sekretaris",
        ),
        (
            date!(2026 - 02 - 05),
            "Sewa",
            "Sewa Aula PT ABC",
            2_500_000,
            Direction::Income,
            "Bendahara",
        ),
        (
            date!(2026 - 02 - 06),
            "Utilitas",
            "Tagihan listrik Januari",
            850_000,
            Direction::Expense,
            "Bendahara",
        ),
        (
            date!(2026 - 02 - 07),
            "Infaq Jumat",
            "Kotak infaq Jumat pekan pertama",
            3_200_000,
            Direction::Income,
            "Takmir",
        ),
    ];

    for (date, category, description, amount, direction, responsible_party) in transactions {
        create_transaction(
            NewTransaction {
                date,
                category: category.to_owned(),
                description: description.to_owned(),
                amount,
                direction,
                responsible_party: responsible_party.to_owned(),
                evidence: String::new(),
            },
            &conn,
        )?;
    }

    println!("Setting the opening balance for January 2026...");
    set_opening_balance(2026, Month::January, 125_000_000, &conn)?;

    println!("Success!");

    Ok(())
}
