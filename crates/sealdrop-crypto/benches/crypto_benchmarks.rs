//! Benchmarks for sealdrop-crypto

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sealdrop_crypto::{
    envelope::{unwrap_key, wrap_key},
    hashing::keccak256,
    keys::{AesKey, RsaKeyPair},
    password::EncryptedPrivateKey,
    symmetric::{decrypt_file, encrypt_file},
};

fn bench_file_cipher(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_cipher");
    let key = AesKey::generate();

    for size in [1024, 64 * 1024, 1024 * 1024].iter() {
        let data = vec![0u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(
            BenchmarkId::new("aes-256-gcm-encrypt", size),
            &data,
            |b, data| b.iter(|| encrypt_file(data, &key).unwrap()),
        );

        let object = encrypt_file(&data, &key).unwrap();
        group.bench_with_input(
            BenchmarkId::new("aes-256-gcm-decrypt", size),
            &object,
            |b, object| b.iter(|| decrypt_file(object, &key).unwrap()),
        );
    }

    group.finish();
}

fn bench_key_wrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_wrap");
    let keypair = RsaKeyPair::generate(2048).unwrap();
    let key = AesKey::generate();

    group.bench_function("rsa-oaep-wrap", |b| {
        b.iter(|| wrap_key(&key, keypair.public_key()).unwrap())
    });

    let wrapped = wrap_key(&key, keypair.public_key()).unwrap();
    group.bench_function("rsa-oaep-unwrap", |b| {
        b.iter(|| unwrap_key(&wrapped, keypair.private_key()).unwrap())
    });

    group.finish();
}

fn bench_password_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("password_lock");
    group.sample_size(10);
    let keypair = RsaKeyPair::generate(2048).unwrap();
    let locked = EncryptedPrivateKey::lock(keypair.private_key(), "bench").unwrap();

    group.bench_function("pbkdf2-unlock", |b| b.iter(|| locked.unlock("bench").unwrap()));

    group.finish();
}

fn bench_address_hashing(c: &mut Criterion) {
    c.bench_function("keccak256-cid", |b| {
        b.iter(|| keccak256(b"bafkreigh2akiscaildcqabsyg3dfr6chu3fgpregiymsck7e7aqa4s52zy"))
    });
}

criterion_group!(
    benches,
    bench_file_cipher,
    bench_key_wrap,
    bench_password_lock,
    bench_address_hashing
);
criterion_main!(benches);
