//! Protocol test vectors
//!
//! Fixed signer key, PIN `1234`, Sepolia (11155111), ten addresses. Every value
//! below is part of the compatibility surface with external verifiers; a change
//! to any of them is a protocol break, not a refactor.

#[allow(clippy::unwrap_used)]
mod protocol_vectors {
    use crate::crypto::{EphemeralKey, StealthKeys, DEFAULT_VIEWING_NODE};
    use crate::encoding::{encode, encode_hex};
    use crate::generator::generate;
    use crate::message::ChallengeMessage;
    use crate::pipeline::{ResolutionParams, StealthResolver};
    use crate::selector::SelectionPolicy;
    use crate::signer::{recover_signer, LocalSigner, Signature, SignatureOracle};
    use crate::{EthAddress, Result};
    use secp256k1::Secp256k1;

    const SIGNER_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const SIGNER_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";
    const PIN: &str = "1234";
    const SEPOLIA: u64 = 11155111;

    const SIG0: &str = "0x75bd0aa971de7666b1d3bdea3aa4cf535823101873ce0f3610e9948051947fce\
                        1aacaa406177fbd54077b301f82e3ac30e7f70f16e757a9cd4181e70dab432b51c";

    const SPENDING_KEY: &str = "ddeb44593bb2f6930518a385d346b23ca6dc8a5f2013aca3355df1b0f26d0128";
    const VIEWING_KEY: &str = "a7c00d3eed9714720b06f5be65a49a3059239a2b1cbaada2f9d3d5dd2e7172a9";
    const SPENDING_PUBKEY: &str =
        "0269150604e4375408baf13b51d7c39e23a4b9fced33e5227e6dfb7782c35b063c";
    const VIEWING_PUBKEY: &str =
        "022959af05f6205a96858aefc2c21b2f8509c8aa99ec5f2ba031a03d311eae5408";

    const VIEWING_NODE_KEY: &str =
        "bbd084b5e0970d12c013dce7f5845a1d28fc61b296827c40c9597ea4117f43ca";
    const VIEWING_NODE_CHAIN_CODE: &str =
        "e1fae210a227ab0f6efadf6b478a0afcd027f1ce60d4bcb1e7ae163abf294a96";

    const EPHEMERAL_KEY_0: &str =
        "db13eb9ecfbe4ed4befb121431e6295ae82ba961afdb34a8cba0f0ee9c35d517";
    const EPHEMERAL_PUBKEY_0: &str =
        "0259c1b40b0fcd7415de58b8d1f9adfb336dc019d89a337ed42f4a56edf397f516";
    const STEALTH_KEY_0: &str = "890ec4b2a751e4701f80b1c9688f1d42d2c89b6e0afb6390a72cea12cc6c931c";

    const SEPOLIA_ADDRESSES: [&str; 10] = [
        "0xe666A6d844FA4B522EF1bca495d9D2e0379C2706",
        "0x6EacD3648AfdE7BaDD85d06a16389b1E8223eAd1",
        "0x7f63B18e59418f8Ec66Fa672e365B3d615cd6b33",
        "0xfB097f4C6D8a71ADc018383A0FC4292822d6376E",
        "0x4B88166dde9B7110a2E0b68E3e19c1E15C690Aff",
        "0x973b5E7387Aca96715A6D9b9D07f32AA1CC7BC99",
        "0x8677806C12202f11Dd1Df11E2FA7b59475B6Ae7E",
        "0xd3C46040624e0af20e04756CD9d302CcB5957598",
        "0xbabA31264F1aa18E97dFfc2d3f9C9Bb291130CE3",
        "0x4Ba4F3f9754376f1aF4048A900a7b15e9F353239",
    ];

    const MAINNET_ADDRESSES: [&str; 10] = [
        "0x9217E566993a72d8ff125496d539F9DC064C6Be6",
        "0xAD8ee2911f1aeA9a2cc274C5A11955Bb8cbED6C1",
        "0x5D3897EF0D040D972a0c2785B084acbC60e847A2",
        "0x422854cB2BB8bEab0bc490d615A586a2BCEa30Bc",
        "0xcB11e2Ed8cFA59b243b1adef1e6C27720A15dEC2",
        "0xF22fC2DCaa26D945BD9dBF351110548BE0f123A7",
        "0xEB1F5F232563d3b1C6ae6c29afB201a4Dc431642",
        "0x7E5BB71019B9264B8b582A855c729b988118721b",
        "0xa9Ed1ed19A5Ff4d680b8BF01A7dAE0409f9a2706",
        "0xC048F65B5ba0415757E7699d714B4cc7F0293575",
    ];

    fn signer() -> LocalSigner {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hex::decode(SIGNER_KEY).unwrap());
        LocalSigner::from_bytes(bytes).unwrap()
    }

    fn sig0() -> Signature {
        SIG0.parse().unwrap()
    }

    fn hex32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hex::decode(s).unwrap());
        out
    }

    /// Test Vector 1: challenge signature
    #[test]
    fn test_vector_1_sig0() {
        let signer = signer();
        assert_eq!(signer.address().to_string(), SIGNER_ADDRESS);

        let message = ChallengeMessage::new(PIN, &signer.address()).unwrap();
        let signature = signer.sign(message.as_bytes()).unwrap();
        assert_eq!(signature, sig0());
        assert_eq!(
            recover_signer(message.as_bytes(), &signature).unwrap(),
            signer.address()
        );
    }

    /// Test Vector 2: key splitting
    #[test]
    fn test_vector_2_spending_and_viewing_keys() {
        let keys = StealthKeys::from_signature(&sig0()).unwrap();
        let (spending, viewing) = keys.export_secrets();
        assert_eq!(hex::encode(spending), SPENDING_KEY);
        assert_eq!(hex::encode(viewing), VIEWING_KEY);
        assert_eq!(hex::encode(keys.spending_pubkey.serialize()), SPENDING_PUBKEY);
        assert_eq!(hex::encode(keys.viewing_pubkey.serialize()), VIEWING_PUBKEY);
        assert_eq!(
            keys.meta_address(),
            format!("st:eth:0x{}{}", SPENDING_PUBKEY, VIEWING_PUBKEY)
        );
    }

    /// Test Vector 3: viewing node m/5564'/0'
    #[test]
    fn test_vector_3_viewing_node() {
        let keys = StealthKeys::from_secrets(hex32(SPENDING_KEY), hex32(VIEWING_KEY)).unwrap();
        let node = keys.viewing_node(DEFAULT_VIEWING_NODE).unwrap();
        assert_eq!(hex::encode(node.private_key_bytes()), VIEWING_NODE_KEY);
        assert_eq!(hex::encode(node.chain_code()), VIEWING_NODE_CHAIN_CODE);
    }

    /// Test Vector 4: nonce 0 ephemeral key and recipient-side stealth key
    #[test]
    fn test_vector_4_ephemeral_and_stealth_key() {
        let keys = StealthKeys::from_signature(&sig0()).unwrap();
        let node = keys.viewing_node(DEFAULT_VIEWING_NODE).unwrap();
        let ephemeral = EphemeralKey::derive(&node, 0, SEPOLIA).unwrap();
        assert_eq!(hex::encode(ephemeral.secret_bytes()), EPHEMERAL_KEY_0);
        assert_eq!(hex::encode(ephemeral.public_key.serialize()), EPHEMERAL_PUBKEY_0);

        let stealth_key = keys.stealth_private_key(&ephemeral.public_key).unwrap();
        assert_eq!(hex::encode(stealth_key.as_bytes()), STEALTH_KEY_0);

        let secp = Secp256k1::new();
        let pubkey = stealth_key.to_secret_key().unwrap().public_key(&secp);
        assert_eq!(
            EthAddress::from_public_key(&pubkey).to_string(),
            SEPOLIA_ADDRESSES[0]
        );
    }

    /// Test Vector 5: the ten Sepolia addresses
    #[test]
    fn test_vector_5_sepolia_addresses() {
        let keys = StealthKeys::from_signature(&sig0()).unwrap();
        let node = keys.viewing_node(DEFAULT_VIEWING_NODE).unwrap();
        let addresses: Vec<String> = generate(&node, &keys.spending_pubkey, 0..10, SEPOLIA)
            .map(|a| a.map(|a| a.address.to_string()))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(addresses, SEPOLIA_ADDRESSES);
    }

    /// Test Vector 6: same keys on mainnet
    #[test]
    fn test_vector_6_mainnet_addresses() {
        let keys = StealthKeys::from_signature(&sig0()).unwrap();
        let node = keys.viewing_node(DEFAULT_VIEWING_NODE).unwrap();
        let addresses: Vec<String> = generate(&node, &keys.spending_pubkey, 0..10, 1)
            .map(|a| a.map(|a| a.address.to_string()))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(addresses, MAINNET_ADDRESSES);
    }

    /// Test Vector 7: encoding of addr[3]
    #[test]
    fn test_vector_7_encoded_address() {
        let address: EthAddress = SEPOLIA_ADDRESSES[3].parse().unwrap();
        let expected = format!(
            "0x{}{}",
            "0".repeat(24),
            SEPOLIA_ADDRESSES[3][2..].to_lowercase()
        );
        assert_eq!(encode_hex(&address), expected);
        assert_eq!(encode(&address).len(), 32);
    }

    /// End-to-end: oracle -> resolver -> payload
    #[test]
    fn test_end_to_end_resolution() {
        let mut params = ResolutionParams::new(PIN);
        params.selection = SelectionPolicy::Primary;
        let resolver = StealthResolver::new(params);

        let resolution = resolver.resolve(&signer()).unwrap();
        assert_eq!(resolution.selected.address.to_string(), SEPOLIA_ADDRESSES[0]);
        assert_eq!(
            resolution.response.data,
            "0x000000000000000000000000e666a6d844fa4b522ef1bca495d9d2e0379c2706"
        );

        let all = resolver.addresses(&sig0()).unwrap();
        let rendered: Vec<String> = all.iter().map(|a| a.address.to_string()).collect();
        assert_eq!(rendered, SEPOLIA_ADDRESSES);
    }
}
