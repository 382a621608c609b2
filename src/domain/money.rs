/// Groups digits in threes, the way the register has always shown amounts.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `1500` -> `1,500円`
pub fn yen(amount: u64) -> String {
    format!("{}円", group_thousands(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(150), "150");
        assert_eq!(group_thousands(1500), "1,500");
        assert_eq!(group_thousands(123456), "123,456");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn appends_yen_sign() {
        assert_eq!(yen(150), "150円");
        assert_eq!(yen(10000), "10,000円");
    }
}
