// # 📂 `tests/test_pipeline.rs`

// * ✅ sequential == parallel, byte for byte, across pool widths
// * ✅ self-inverse: transform(transform(x)) == x
// * ✅ batch shape: 10 blocks on 4 workers -> (4, 4, 2)
// * ✅ boundary conditions (empty input, exact multiple, trailing short block)
// * ✅ readers that deliver data in small pieces

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;
    use xorstream_core::crypto::{rotated, Key};
    use xorstream_core::stream::{
        run_parallel_pipeline, run_pipeline, run_sequential_pipeline, transform_bytes,
        PipelineConfig,
    };
    use xorstream_core::types::StreamError;

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen()).collect()
    }

    fn sequential(data: &[u8], key: &Key) -> Vec<u8> {
        let mut out = Vec::new();
        run_sequential_pipeline(data, &mut out, key).unwrap();
        out
    }

    fn parallel(data: &[u8], key: &Key, workers: usize) -> Vec<u8> {
        let mut out = Vec::new();
        run_parallel_pipeline(data, &mut out, key, workers).unwrap();
        out
    }

    /// Straightforward model: block i XOR rotate(key, i).
    fn model(data: &[u8], key: &Key) -> Vec<u8> {
        data.chunks(key.len())
            .enumerate()
            .flat_map(|(i, chunk)| {
                let k = rotated(key.as_bytes(), i as u64);
                chunk.iter().zip(k).map(|(b, k)| b ^ k).collect::<Vec<_>>()
            })
            .collect()
    }

    /// Hands out at most `step` bytes per read call.
    struct Trickle<R> {
        inner: R,
        step: usize,
    }

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.step);
            self.inner.read(&mut buf[..n])
        }
    }

    /// Fails with `Interrupted` on every other call.
    struct Flaky<R> {
        inner: R,
        fail_next: bool,
    }

    impl<R: Read> Read for Flaky<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.fail_next = !self.fail_next;
            if self.fail_next {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
            }
            self.inner.read(buf)
        }
    }

    /// Serves `inner`, then fails instead of reporting end of stream.
    struct FailAtEnd<R> {
        inner: R,
    }

    impl<R: Read> Read for FailAtEnd<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.inner.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "device gone")),
                n => Ok(n),
            }
        }
    }

    // ------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------
    #[test]
    fn all_ones_key_xors_every_byte_with_ff() {
        let key = Key::from_bytes(vec![0xFF]).unwrap();
        let input = [0x00u8, 0x01, 0x02];
        let expected = vec![0xFF, 0xFE, 0xFD];

        assert_eq!(sequential(&input, &key), expected);
        for workers in 1..=4 {
            assert_eq!(parallel(&input, &key, workers), expected);
        }
    }

    #[test]
    fn ten_blocks_on_four_workers_make_three_batches() {
        let key = Key::from_bytes(b"0123456789abcdef".to_vec()).unwrap();
        let input = random_bytes(10 * key.len(), 7);

        let mut out = Vec::new();
        let snapshot = run_parallel_pipeline(&input[..], &mut out, &key, 4).unwrap();

        assert_eq!(snapshot.batch_sizes, vec![4, 4, 2]);
        assert_eq!(snapshot.counters.batches, 3);
        assert_eq!(snapshot.counters.blocks, 10);
        assert_eq!(snapshot.counters.short_blocks, 0);
        assert_eq!(snapshot.worker_blocks.iter().sum::<u64>(), 10);
        assert!(snapshot.sanity_check());
        assert_eq!(out, model(&input, &key));
    }

    #[test]
    fn short_final_block_lands_in_last_batch() {
        let key = Key::from_bytes(vec![1, 2, 3, 4, 5]).unwrap();
        let input = random_bytes(5 * 9 + 3, 11);

        let mut out = Vec::new();
        let snapshot = run_parallel_pipeline(&input[..], &mut out, &key, 4).unwrap();

        assert_eq!(snapshot.batch_sizes, vec![4, 4, 2]);
        assert_eq!(snapshot.counters.short_blocks, 1);
        assert_eq!(out.len(), input.len());
        assert_eq!(out, sequential(&input, &key));
    }

    #[test]
    fn sequential_equals_parallel_for_every_width() {
        for (key_len, data_len) in [(1, 100), (3, 0), (7, 7), (16, 1000), (33, 4097), (300, 10_000)] {
            let key = Key::from_bytes(random_bytes(key_len, key_len as u64)).unwrap();
            let input = random_bytes(data_len, data_len as u64 + 1);

            let expected = sequential(&input, &key);
            assert_eq!(expected, model(&input, &key));
            assert_eq!(expected.len(), input.len());

            for workers in [1, 2, 3, 4, 5, 8, 13] {
                assert_eq!(
                    parallel(&input, &key, workers),
                    expected,
                    "key_len={key_len} data_len={data_len} workers={workers}"
                );
            }
        }
    }

    #[test]
    fn transform_is_self_inverse_across_widths() {
        let key = Key::from_bytes(b"not a real cipher".to_vec()).unwrap();
        let plaintext = random_bytes(5_000, 42);

        let ciphertext = transform_bytes(&plaintext, &key, 0).unwrap();
        assert_ne!(ciphertext, plaintext);

        for workers in [0, 1, 4, 9] {
            assert_eq!(transform_bytes(&ciphertext, &key, workers).unwrap(), plaintext);
        }
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let key = Key::from_bytes(vec![9, 9]).unwrap();

        let mut out = Vec::new();
        let snapshot = run_parallel_pipeline(io::empty(), &mut out, &key, 3).unwrap();
        assert!(out.is_empty());
        assert!(snapshot.batch_sizes.is_empty());
        assert_eq!(snapshot.counters.blocks, 0);

        let snapshot = run_sequential_pipeline(io::empty(), &mut out, &key).unwrap();
        assert!(out.is_empty());
        assert_eq!(snapshot.counters.blocks, 0);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_batch() {
        let key = Key::from_bytes(vec![0x5A; 8]).unwrap();
        let input = random_bytes(8 * 8, 3);

        let mut out = Vec::new();
        let snapshot = run_parallel_pipeline(&input[..], &mut out, &key, 4).unwrap();
        assert_eq!(snapshot.batch_sizes, vec![4, 4]);
        assert_eq!(out, model(&input, &key));
    }

    #[test]
    fn trickling_reader_still_yields_full_blocks() {
        let key = Key::from_bytes(random_bytes(13, 5)).unwrap();
        let input = random_bytes(13 * 6 + 4, 6);
        let expected = model(&input, &key);

        for step in [1, 2, 5, 12] {
            let mut out = Vec::new();
            let reader = Trickle { inner: Cursor::new(input.clone()), step };
            let snapshot = run_parallel_pipeline(reader, &mut out, &key, 3).unwrap();
            assert_eq!(out, expected, "step={step}");
            assert_eq!(snapshot.counters.short_blocks, 1);

            let mut out = Vec::new();
            let reader = Trickle { inner: Cursor::new(input.clone()), step };
            run_sequential_pipeline(reader, &mut out, &key).unwrap();
            assert_eq!(out, expected, "step={step}");
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let key = Key::from_bytes(vec![0x0F, 0xF0, 0x33]).unwrap();
        let input = random_bytes(50, 8);

        let mut out = Vec::new();
        let reader = Flaky { inner: Cursor::new(input.clone()), fail_next: false };
        run_parallel_pipeline(reader, &mut out, &key, 2).unwrap();
        assert_eq!(out, model(&input, &key));
    }

    #[test]
    fn failing_writer_surfaces_io_error() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let key = Key::from_bytes(vec![1, 2]).unwrap();
        let input = random_bytes(40, 9);

        let err = run_parallel_pipeline(&input[..], Broken, &key, 2).unwrap_err();
        assert!(matches!(err, StreamError::Io(_)));

        let err = run_sequential_pipeline(&input[..], Broken, &key).unwrap_err();
        assert!(matches!(err, StreamError::Io(_)));
    }

    #[test]
    fn read_error_mid_batch_flushes_blocks_already_submitted() {
        let key = Key::from_bytes(vec![0xC3, 0x3C, 0x5A, 0xA5]).unwrap();
        // 6 full blocks: one full batch of 4, then 2 in flight when input fails
        let input = random_bytes(4 * 6, 12);

        let mut out = Vec::new();
        let reader = FailAtEnd { inner: Cursor::new(input.clone()) };
        let err = run_parallel_pipeline(reader, &mut out, &key, 4).unwrap_err();

        assert!(matches!(err, StreamError::Io(_)));
        assert_eq!(out, model(&input, &key));
    }

    #[test]
    fn read_error_before_any_block_writes_nothing() {
        let key = Key::from_bytes(vec![1, 2, 3]).unwrap();

        let mut out = Vec::new();
        let reader = FailAtEnd { inner: io::empty() };
        let err = run_parallel_pipeline(reader, &mut out, &key, 2).unwrap_err();

        assert!(matches!(err, StreamError::Io(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn run_pipeline_dispatches_on_width() {
        let key = Key::from_bytes(vec![3, 1, 4, 1, 5]).unwrap();
        let input = random_bytes(123, 10);

        let mut out = Vec::new();
        let snapshot = run_pipeline(&input[..], &mut out, &key, &PipelineConfig::sequential()).unwrap();
        assert_eq!(snapshot.workers, 0);
        assert!(snapshot.batch_sizes.is_empty());

        let mut out_par = Vec::new();
        let config = PipelineConfig::with_workers(6).unwrap();
        let snapshot = run_pipeline(&input[..], &mut out_par, &key, &config).unwrap();
        assert_eq!(snapshot.workers, 6);
        assert_eq!(snapshot.worker_blocks.len(), 6);
        assert_eq!(out, out_par);
    }

    #[test]
    fn parallel_rejects_zero_and_oversized_width() {
        let key = Key::from_bytes(vec![1]).unwrap();
        assert!(matches!(
            run_parallel_pipeline(&b"x"[..], Vec::new(), &key, 0),
            Err(StreamError::Config(_))
        ));
        assert!(PipelineConfig::with_workers(100_000).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_parallel_matches_sequential(
            key in prop::collection::vec(any::<u8>(), 1..24),
            data in prop::collection::vec(any::<u8>(), 0..600),
            workers in 1usize..7,
        ) {
            let key = Key::from_bytes(key).unwrap();
            let seq = sequential(&data, &key);
            prop_assert_eq!(seq.len(), data.len());
            prop_assert_eq!(parallel(&data, &key, workers), seq.clone());
            prop_assert_eq!(parallel(&seq, &key, workers), data);
        }
    }
}
