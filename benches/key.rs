#![feature(test)]

extern crate test;

use hex_literal::hex;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa_privkey::RsaPrivateKey;
use test::Bencher;

fn get_key() -> RsaPrivateKey {
    // 2048 bits, e = 3; n and d are derived on first use
    let primes = [
        hex!(
            "ba69948f830c296242da6bf9ae3fddb76a63dbf0761ed3f644bc"
            "a96a2e1eb75fd1bbd9cd93c72330bcc2a97cfafd12ee27bfde0f"
            "b6ac152df2ec4ab12b11265b41bcb531e39f347fdf09e9562a6e"
            "5a7c020c6534df61c955dd772cc7b9d461fdeea2f3b83663302c"
            "fe5656c235d4ac94c81658ad179919cded8ab1be1e9aa369"
        ),
        hex!(
            "9bb7d344184526d29c689eddf0141bf65f013477e36b260e32ae"
            "42c680b2c5ada9181bff32b9f1bfbdd3c29f59fcc3f4b9ee4ce6"
            "766d18ca2fa4fe5c19d24b436c39a781f7a2972e59e616f58cab"
            "bb6132084008fe10ff4dddd054fd2e91cd7d043b8f9795a07881"
            "6cdb5f2e895394e29c37c3e12de41d4f67f17e64baf92c65"
        ),
    ];

    let mut key = RsaPrivateKey::new();
    key.set_p(&primes[0]);
    key.set_q(&primes[1]);
    key.set_e(&[3]);
    key
}

#[bench]
fn bench_rsa_1024_gen_key(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let key = RsaPrivateKey::generate_with_rng(&mut rng, 1024).unwrap();
        test::black_box(key);
    });
}

#[bench]
fn bench_rsa_2048_materialize(b: &mut Bencher) {
    let mut key = get_key();
    let e = key.e().to_vec();
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        // resetting a component releases the cached key
        key.set_e(&e);
        test::black_box(key.native_key_with_rng(&mut rng).is_some());
    });
}

#[bench]
fn bench_rsa_2048_pkcs8_encode_cached(b: &mut Bencher) {
    let mut key = get_key();
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    assert!(key.native_key_with_rng(&mut rng).is_some());

    b.iter(|| {
        let der = key.encode_pkcs8_der_with_rng(&mut rng);
        test::black_box(der);
    });
}

#[bench]
fn bench_rsa_2048_pkcs8_decode(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let der = get_key().encode_pkcs8_der_with_rng(&mut rng);
    assert!(!der.is_empty());

    let mut key = RsaPrivateKey::new();
    b.iter(|| {
        let res = key.decode_pkcs8_der_with_rng(&der, &mut rng);
        test::black_box(res).unwrap();
    });
}
