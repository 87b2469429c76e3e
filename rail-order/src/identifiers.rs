use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BOOKING_ID_PREFIX: &str = "BK";
const BOOKING_ID_SUFFIX_LEN: usize = 9;

/// `BK` followed by nine upper-case base-36 characters. Uniqueness is not checked.
pub fn generate_booking_id() -> String {
    generate_booking_id_with(&mut rand::thread_rng())
}

pub fn generate_booking_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..BOOKING_ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", BOOKING_ID_PREFIX, suffix)
}

/// Ten decimal digits taken from a random fraction, zero padded.
pub fn generate_pnr_number() -> String {
    generate_pnr_number_with(&mut rand::thread_rng())
}

pub fn generate_pnr_number_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits = (rng.gen::<f64>() * 1e10) as u64;
    format!("{:010}", digits.min(9_999_999_999))
}
