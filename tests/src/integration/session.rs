//! # Session Flow
//!
//! Wallet session events driving screens, and the signature-derived key.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mc_01_wallet::ProviderEvent;
    use mc_02_encryption::KEY_DERIVATION_MESSAGE;
    use mc_04_contracts::{ContractName, Token};
    use medichain_runtime::screens::{PatientDashboard, Screen, ScreenHost, ScreenState};

    use crate::integration::fixtures::World;

    const NFT: ContractName = ContractName::PatientNft;

    fn answer_registered(world: &World) {
        world.answer(NFT, "balanceOf", vec![Token::from(1u64)]);
        world.answer(NFT, "tokenOfOwnerByIndex", vec![Token::from(5u64)]);
        world.answer(NFT, "getMedicalRecords", vec![Token::Array(vec![])]);
    }

    #[tokio::test]
    async fn test_same_key_on_every_device() {
        assert_eq!(
            KEY_DERIVATION_MESSAGE,
            "Sign this message to encrypt/decrypt your medical records"
        );
        let world = World::new();
        let phone = world.party(0x51);
        let laptop = world.party(0x51);
        phone.connect().await;
        laptop.connect().await;

        let a = phone.app.encryptor().unwrap().key().await.unwrap();
        let b = laptop.app.encryptor().unwrap().key().await.unwrap();
        assert!(a == b);

        let envelope = phone
            .app
            .encryptor()
            .unwrap()
            .encrypt_bytes(b"")
            .await
            .unwrap();
        let plain = laptop
            .app
            .encryptor()
            .unwrap()
            .decrypt_bytes(&envelope)
            .await
            .unwrap();
        assert!(plain.is_empty());
    }

    #[tokio::test]
    async fn test_host_follows_session_lifecycle() {
        let world = World::new();
        let party = world.party(0x52);
        answer_registered(&world);

        let screen = Arc::new(PatientDashboard::new(Arc::clone(&party.app)));
        let mut host = ScreenHost::new(Arc::clone(&screen), party.app.wallet());
        assert_eq!(host.mount().await.unwrap(), ScreenState::Disconnected);

        party.connect().await;
        host.process_pending().await;
        assert_eq!(screen.state(), ScreenState::ConnectedRegistered);
        assert_eq!(screen.token_id().map(|t| t.low_u64()), Some(5));

        party.app.wallet().disconnect().await.unwrap();
        host.process_pending().await;
        assert_eq!(screen.state(), ScreenState::Disconnected);
        assert!(screen.token_id().is_none());
    }

    #[tokio::test]
    async fn test_network_change_reloads_and_reconnects() {
        let world = World::new();
        let party = world.party(0x53);
        answer_registered(&world);

        let screen = Arc::new(PatientDashboard::new(Arc::clone(&party.app)));
        let mut host = ScreenHost::new(Arc::clone(&screen), party.app.wallet());
        party.connect().await;
        host.process_pending().await;
        assert_eq!(screen.state(), ScreenState::ConnectedRegistered);

        party.app.wallet().switch_network(137).await.unwrap();
        // ChainChanged, ReloadRequested, then Connected from auto-connect.
        assert_eq!(host.process_pending().await, 3);
        assert_eq!(party.app.wallet().chain_id(), Some(137));
        assert_eq!(screen.state(), ScreenState::ConnectedRegistered);
    }

    #[tokio::test]
    async fn test_locked_wallet_resets_screen() {
        let world = World::new();
        let party = world.party(0x54);
        answer_registered(&world);

        let screen = Arc::new(PatientDashboard::new(Arc::clone(&party.app)));
        let mut host = ScreenHost::new(Arc::clone(&screen), party.app.wallet());
        party.connect().await;
        host.process_pending().await;

        party
            .app
            .wallet()
            .handle_provider_event(ProviderEvent::AccountsChanged(vec![]))
            .await
            .unwrap();
        host.process_pending().await;
        assert_eq!(screen.state(), ScreenState::Disconnected);
        assert!(!party.app.wallet().is_connected());
    }
}
