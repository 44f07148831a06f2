#[cfg(test)]
mod tests {
    use r_pickle::{Pickle, UNREPRESENTABLE_PICKLE_SIZE, find_next, peek_next, split_next};
    use r_pickle_header::total_pickle_size;

    fn encoded(header_size: usize) -> Vec<u8> {
        let mut pickle = Pickle::with_header_size(header_size);
        pickle.write_int(0x1234);
        pickle.write_string("Goooooooooooogle");
        pickle.data().unwrap().to_vec()
    }

    fn check_boundaries(header_size: usize) {
        let bytes = encoded(header_size);
        let total = bytes.len();

        // Shorter than the header: nothing is known yet
        assert_eq!(peek_next(header_size, &[]), None);
        assert_eq!(find_next(header_size, &[]), None);
        for len in 0..header_size {
            assert_eq!(peek_next(header_size, &bytes[..len]), None, "len {}", len);
            assert_eq!(find_next(header_size, &bytes[..len]), None, "len {}", len);
        }

        // Header present: size is known, the pickle is not yet complete
        for len in header_size..total {
            assert_eq!(peek_next(header_size, &bytes[..len]), Some(total), "len {}", len);
            assert_eq!(find_next(header_size, &bytes[..len]), None, "len {}", len);
        }

        // Complete, with or without bytes that follow
        assert_eq!(peek_next(header_size, &bytes), Some(total));
        assert_eq!(find_next(header_size, &bytes), Some(total));

        let mut longer = bytes.clone();
        longer.extend_from_slice(&[0u8; 7]);
        assert_eq!(find_next(header_size, &longer), Some(total));
    }

    #[test]
    fn test_default_header_boundaries() {
        check_boundaries(4);
    }

    #[test]
    fn test_custom_header_boundaries() {
        check_boundaries(16);
    }

    #[test]
    fn test_header_only_and_one_byte_short_are_distinct() {
        let bytes = encoded(4);
        let header_only = &bytes[..4];
        let one_short = &bytes[..bytes.len() - 1];

        assert_eq!(peek_next(4, header_only), Some(bytes.len()));
        assert_eq!(peek_next(4, one_short), Some(bytes.len()));
        assert_eq!(find_next(4, header_only), None);
        assert_eq!(find_next(4, one_short), None);
        assert_eq!(find_next(4, &bytes), Some(bytes.len()));
    }

    #[test]
    fn test_empty_payload_pickle() {
        let pickle = Pickle::new();
        let bytes = pickle.data().unwrap();
        assert_eq!(peek_next(4, bytes), Some(4));
        assert_eq!(find_next(4, bytes), Some(4));
    }

    #[test]
    fn test_bogus_size_is_reported_not_wrapped() {
        let mut bytes = u32::MAX.to_ne_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 12]);

        let declared = peek_next(16, &bytes).expect("header present");
        assert!(declared > bytes.len(), "Declared size must never look small");
        assert_eq!(find_next(16, &bytes), None);

        assert_eq!(
            total_pickle_size(16, usize::MAX - 8),
            UNREPRESENTABLE_PICKLE_SIZE
        );
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_overflowing_size_reports_sentinel() {
        let mut bytes = u32::MAX.to_ne_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 12]);
        assert_eq!(peek_next(16, &bytes), Some(UNREPRESENTABLE_PICKLE_SIZE));
    }

    #[test]
    fn test_split_walks_back_to_back_pickles() {
        let first = encoded(4);
        let mut second = Pickle::new();
        second.write_bool(true);
        let second = second.data().unwrap().to_vec();

        let mut stream = first.clone();
        stream.extend_from_slice(&second);
        stream.extend_from_slice(&[1, 0]); // partial header of a third

        let (a, rest) = split_next(4, &stream).unwrap();
        assert_eq!(a, &first[..]);
        let (b, rest) = split_next(4, rest).unwrap();
        assert_eq!(b, &second[..]);
        assert_eq!(rest, &[1, 0]);
        assert_eq!(split_next(4, rest), None);

        let view = Pickle::from_bytes(b);
        assert_eq!(view.iter().read_bool(), Some(true));
    }
}
